use crate::core::domain::{ExecutionResult, TestCase, Verdict};

/// Decides the verdict of one executed test case.
///
/// A timeout or a failed run wins over whatever the program printed. Only a
/// clean exit is compared against the expected output, ignoring trailing
/// whitespace on both sides.
pub fn classify(execution: &ExecutionResult, test_case: &TestCase) -> Verdict {
    if execution.timed_out {
        return Verdict::Timeout;
    }
    if !execution.exited_successfully() {
        return Verdict::RuntimeError;
    }

    if execution.stdout.trim_end() == test_case.expected_output.trim_end() {
        Verdict::Passed
    } else {
        Verdict::WrongAnswer
    }
}
