use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Workspace for submission {id} already exists")]
    AlreadyExists { id: Uuid },
}

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("Internal error: {msg}")]
    Internal { msg: String },
}
