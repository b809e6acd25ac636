use std::time::Duration;

use crate::core::domain::Artifact;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    /// `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub execution_time: Duration,
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("Failed to launch process: {msg}")]
    FailedToLaunch { msg: String },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait Runner: std::fmt::Debug + Send + Sync {
    async fn run(
        &self,
        artifact: &Artifact,
        stdin: &str,
        time_limit: Duration,
    ) -> Result<RunResult, RunError>;
}
