use crate::core::domain::{OverallStatus, Verdict};

/// Folds per-test verdicts into the submission's overall status.
///
/// Execution failures outrank wrong answers. An empty list passes.
pub fn aggregate<'a, I>(verdicts: I) -> OverallStatus
where
    I: IntoIterator<Item = &'a Verdict>,
{
    let mut overall = OverallStatus::Passed;

    for verdict in verdicts {
        match verdict {
            Verdict::Timeout | Verdict::RuntimeError => return OverallStatus::Error,
            Verdict::WrongAnswer => overall = OverallStatus::WrongAnswer,
            Verdict::Passed => {}
        }
    }

    overall
}
