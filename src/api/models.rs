use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(alias = "code")]
    pub source_code: String,
    #[serde(default)]
    pub language: Option<String>,
    pub test_cases: Vec<TestCaseRequest>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRequest {
    pub input: String,
    #[serde(alias = "expectedOutput")]
    pub correct_output: String,
    /// Accepted for compatibility with older clients; never graded against.
    #[serde(default)]
    pub incorrect_output: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum JudgeResponse {
    Judged(JudgedResponse),
    Failed(ErrorResponse),
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgedResponse {
    pub results: Vec<TestResultResponse>,
    pub overall_status: OverallStatusResponse,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultResponse {
    pub test_case_index: usize,
    pub actual_output: String,
    pub expected_output: String,
    pub verdict: VerdictResponse,
    pub stderr: String,
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerdictResponse {
    Passed,
    WrongAnswer,
    RuntimeError,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OverallStatusResponse {
    Passed,
    WrongAnswer,
    Error,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    CompilationError,
    InternalError,
    InvalidRequest,
}

impl ErrorResponse {
    pub fn compilation(diagnostics: String) -> Self {
        Self {
            error: ErrorKind::CompilationError,
            diagnostics: Some(diagnostics),
            message: None,
        }
    }

    pub fn internal(message: String) -> Self {
        Self {
            error: ErrorKind::InternalError,
            diagnostics: None,
            message: Some(message),
        }
    }

    pub fn invalid_request(message: String) -> Self {
        Self {
            error: ErrorKind::InvalidRequest,
            diagnostics: None,
            message: Some(message),
        }
    }
}
