use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::fs;
use uuid::Uuid;

use crate::constants::{BINARY_FILE_NAME, SOURCE_FILE_NAME, WORKSPACE_DIR_PREFIX};
use crate::core::errors::WorkspaceError;

/// Hands out one directory per submission under a common root.
///
/// Every live workspace is tracked by submission id, so two submissions
/// can never be given the same directory.
#[derive(Clone, Debug)]
pub struct WorkspaceManager {
    root: PathBuf,
    live: Arc<DashMap<Uuid, PathBuf>>,
}

impl WorkspaceManager {
    pub fn new<T: AsRef<Path>>(root: T) -> Self {
        Self {
            root: root.as_ref().into(),
            live: Arc::new(DashMap::new()),
        }
    }

    /// Number of workspaces created and not yet released.
    pub fn active(&self) -> usize {
        self.live.len()
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, submission_id: Uuid) -> Result<Workspace, WorkspaceError> {
        let dir = self
            .root
            .join(format!("{}{}", WORKSPACE_DIR_PREFIX, submission_id));

        match self.live.entry(submission_id) {
            Entry::Occupied(_) => return Err(WorkspaceError::AlreadyExists { id: submission_id }),
            Entry::Vacant(entry) => {
                entry.insert(dir.clone());
            }
        }

        let created = match fs::create_dir_all(&self.root).await {
            Ok(()) => fs::create_dir(&dir).await,
            Err(e) => Err(e),
        };
        if let Err(source) = created {
            self.live.remove(&submission_id);
            return Err(WorkspaceError::Create { path: dir, source });
        }

        tracing::debug!("Workspace created at {}", dir.display());

        Ok(Workspace {
            id: submission_id,
            source_path: dir.join(SOURCE_FILE_NAME),
            binary_path: dir.join(BINARY_FILE_NAME),
            dir,
            live: self.live.clone(),
            released: false,
        })
    }
}

/// Scoped handle to a submission's directory.
///
/// Released either by [`Workspace::destroy`] or, if that never runs
/// (cancellation, panic), when the handle is dropped.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    dir: PathBuf,
    source_path: PathBuf,
    binary_path: PathBuf,
    live: Arc<DashMap<Uuid, PathBuf>>,
    released: bool,
}

impl Workspace {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Deletes everything in the workspace. Failures are logged only.
    pub async fn destroy(mut self) {
        self.released = true;
        let removed = fs::remove_dir_all(&self.dir).await;
        self.live.remove(&self.id);
        log_removal(&self.dir, removed);
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        tracing::debug!("Workspace {} released on drop", self.id);
        // Blocking, but only reached when `destroy` never ran (cancellation
        // or panic), and the directory must be gone once the handle is.
        let removed = std::fs::remove_dir_all(&self.dir);
        self.live.remove(&self.id);
        log_removal(&self.dir, removed);
    }
}

fn log_removal(dir: &Path, removed: std::io::Result<()>) {
    match removed {
        Ok(()) => tracing::debug!("Workspace {} removed", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Workspace {} was already gone", dir.display())
        }
        Err(e) => tracing::warn!("Failed to clean up workspace {}: {}", dir.display(), e),
    }
}
