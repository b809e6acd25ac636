use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Submission {
    pub id: Uuid,
    pub received_at: chrono::DateTime<chrono::Utc>,
    pub code: String,
    pub language: Language,
    pub test_cases: Vec<TestCase>,
}

impl Submission {
    pub fn new(code: impl Into<String>, language: Language, test_cases: Vec<TestCase>) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: chrono::Utc::now(),
            code: code.into(),
            language,
            test_cases,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    GnuCpp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// Compiled binary owned by one submission's workspace.
///
/// Shared read-only between all test case executions of that submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub submission_id: Uuid,
    pub path: PathBuf,
    /// Compiler output of a successful build (usually warnings).
    pub warnings: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    Exited { code: i32 },
    Signaled { signal: i32 },
    TimedOut { limit_ms: u64 },
    FailedToLaunch { msg: String },
}

impl Termination {
    pub fn describe(&self) -> String {
        match self {
            Termination::Exited { code } => format!("exited with status {}", code),
            Termination::Signaled { signal } => format!("terminated by signal {}", signal),
            Termination::TimedOut { limit_ms } => format!("timed out after {} ms", limit_ms),
            Termination::FailedToLaunch { msg } => format!("failed to launch: {}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    pub test_case_index: usize,
    /// Stdout with trailing whitespace removed.
    pub stdout: String,
    pub stderr: String,
    pub termination: Termination,
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl ExecutionResult {
    pub fn exited_successfully(&self) -> bool {
        !self.timed_out && self.termination == Termination::Exited { code: 0 }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Passed,
    WrongAnswer,
    RuntimeError,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverallStatus {
    Passed,
    WrongAnswer,
    Error,
    CompilationError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestOutcome {
    pub execution: ExecutionResult,
    pub expected_output: String,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionResult {
    pub submission_id: Uuid,
    pub overall: OverallStatus,
    pub outcomes: Vec<TestOutcome>,
    /// Failure text when compilation failed, warnings otherwise.
    pub diagnostics: String,
}

impl SubmissionResult {
    pub fn compilation_failed(submission_id: Uuid, diagnostics: String) -> Self {
        Self {
            submission_id,
            overall: OverallStatus::CompilationError,
            outcomes: Vec::new(),
            diagnostics,
        }
    }

    pub fn verdicts(&self) -> Vec<Verdict> {
        self.outcomes.iter().map(|outcome| outcome.verdict).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    Received,
    Compiling,
    CompileFailed,
    Compiled,
    Executing { index: usize },
    Completed,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::CompileFailed | SubmissionState::Completed | SubmissionState::Failed
        )
    }
}
