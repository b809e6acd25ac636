use std::collections::HashMap;
use std::time::Duration;

use crate::{
    core::domain::Artifact,
    core::traits::runner::{RunError, RunResult, Runner},
    stubs::ConcurrencyProbe,
};

type Scripted = (Result<RunResult, RunError>, Duration);

/// Answers each run by looking up its stdin, after the scripted delay.
#[derive(Debug, Clone)]
pub struct RunnerStub {
    fallback: Scripted,
    scripted: HashMap<String, Scripted>,
    probe: ConcurrencyProbe,
}

impl RunnerStub {
    pub fn new(result: Result<RunResult, RunError>, delay: Duration) -> Self {
        Self {
            fallback: (result, delay),
            scripted: HashMap::new(),
            probe: ConcurrencyProbe::default(),
        }
    }

    pub fn with_input(
        mut self,
        stdin: &str,
        result: Result<RunResult, RunError>,
        delay: Duration,
    ) -> Self {
        self.scripted.insert(stdin.to_string(), (result, delay));
        self
    }

    pub fn probe(&self) -> ConcurrencyProbe {
        self.probe.clone()
    }
}

pub fn exited(stdout: &str, status: i32) -> RunResult {
    RunResult {
        status: Some(status),
        signal: None,
        stdout: stdout.to_string(),
        stderr: String::new(),
        execution_time: Duration::from_millis(5),
        timed_out: false,
    }
}

pub fn timed_out(limit: Duration) -> RunResult {
    RunResult {
        status: None,
        signal: Some(9),
        stdout: String::new(),
        stderr: String::new(),
        execution_time: limit,
        timed_out: true,
    }
}

#[async_trait::async_trait]
impl Runner for RunnerStub {
    #[tracing::instrument(skip(self, artifact), fields(submission_id = %artifact.submission_id))]
    async fn run(
        &self,
        artifact: &Artifact,
        stdin: &str,
        time_limit: Duration,
    ) -> Result<RunResult, RunError> {
        let _guard = self.probe.enter();
        tracing::debug!("Running {} with limit {:?}", artifact.path.display(), time_limit);

        let (result, delay) = self.scripted.get(stdin).unwrap_or(&self.fallback);
        tokio::time::sleep(*delay).await;
        tracing::debug!("Execution result: {:?}", result);

        result.clone()
    }
}
