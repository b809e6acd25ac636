use crate::api::models::{
    ErrorResponse, JudgeResponse, JudgedResponse, OverallStatusResponse, SubmitRequest,
    TestResultResponse, VerdictResponse,
};
use crate::core::{
    domain::{Language, OverallStatus, Submission, SubmissionResult, TestCase, TestOutcome, Verdict},
    errors::JudgeError,
};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Source code must not be empty")]
    EmptySource,
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage { language: String },
}

pub fn parse_request(body: &str) -> Result<Submission, ConversionError> {
    let request: SubmitRequest = serde_json::from_str(body)?;
    request.try_into()
}

impl TryFrom<SubmitRequest> for Submission {
    type Error = ConversionError;

    fn try_from(req: SubmitRequest) -> Result<Self, ConversionError> {
        if req.source_code.trim().is_empty() {
            return Err(ConversionError::EmptySource);
        }
        let language = parse_language(req.language.as_deref())?;

        let test_cases = req
            .test_cases
            .into_iter()
            .map(|test_case| TestCase::new(test_case.input, test_case.correct_output))
            .collect();

        Ok(Submission::new(req.source_code, language, test_cases))
    }
}

fn parse_language(language: Option<&str>) -> Result<Language, ConversionError> {
    let Some(language) = language else {
        return Ok(Language::default());
    };

    match language.trim().to_ascii_lowercase().as_str() {
        "cpp" | "c++" | "gnu-cpp" => Ok(Language::GnuCpp),
        _ => Err(ConversionError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}

impl From<SubmissionResult> for JudgeResponse {
    fn from(result: SubmissionResult) -> Self {
        let overall_status = match result.overall {
            OverallStatus::CompilationError => {
                return JudgeResponse::Failed(ErrorResponse::compilation(result.diagnostics));
            }
            OverallStatus::Passed => OverallStatusResponse::Passed,
            OverallStatus::WrongAnswer => OverallStatusResponse::WrongAnswer,
            OverallStatus::Error => OverallStatusResponse::Error,
        };

        JudgeResponse::Judged(JudgedResponse {
            results: result.outcomes.into_iter().map(Into::into).collect(),
            overall_status,
        })
    }
}

impl From<TestOutcome> for TestResultResponse {
    fn from(outcome: TestOutcome) -> Self {
        let elapsed_ms = outcome.execution.elapsed_ms();
        Self {
            test_case_index: outcome.execution.test_case_index,
            actual_output: outcome.execution.stdout,
            expected_output: outcome.expected_output,
            verdict: outcome.verdict.into(),
            stderr: outcome.execution.stderr,
            elapsed_ms,
            timed_out: outcome.execution.timed_out,
        }
    }
}

impl From<Verdict> for VerdictResponse {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Passed => VerdictResponse::Passed,
            Verdict::WrongAnswer => VerdictResponse::WrongAnswer,
            Verdict::RuntimeError => VerdictResponse::RuntimeError,
            Verdict::Timeout => VerdictResponse::Timeout,
        }
    }
}

impl From<&JudgeError> for JudgeResponse {
    fn from(error: &JudgeError) -> Self {
        JudgeResponse::Failed(ErrorResponse::internal(error.to_string()))
    }
}

impl From<&ConversionError> for JudgeResponse {
    fn from(error: &ConversionError) -> Self {
        JudgeResponse::Failed(ErrorResponse::invalid_request(error.to_string()))
    }
}
