use crate::core::{domain::Artifact, workspace::Workspace};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("Compilation failed:\n{diagnostics}")]
    CompilationFailed { diagnostics: String },
    #[error("Compilation exceeded the time limit of {limit_ms} ms")]
    TimedOut { limit_ms: u64 },
    #[error("Internal compiler error: {msg}")]
    Internal { msg: String },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait Compiler: std::fmt::Debug + Send + Sync {
    /// Builds `source` inside `workspace`, producing the workspace's binary.
    async fn compile(&self, source: &str, workspace: &Workspace) -> Result<Artifact, CompileError>;
}
