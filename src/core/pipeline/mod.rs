use tokio::sync::mpsc::UnboundedSender;

use crate::core::domain::SubmissionState;

pub mod compiling;
pub mod running;

/// Optional sink for submission state changes.
///
/// Never waits on the receiver. A dropped receiver is not an error: judging
/// carries on without reporting.
#[derive(Clone, Debug, Default)]
pub struct Progress {
    tx: Option<UnboundedSender<SubmissionState>>,
}

impl Progress {
    pub fn new(tx: UnboundedSender<SubmissionState>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn report(&self, state: SubmissionState) {
        if state.is_terminal() {
            tracing::info!("Submission state: {:?}", state);
        } else {
            tracing::debug!("Submission state: {:?}", state);
        }

        if let Some(tx) = &self.tx {
            if tx.send(state).is_err() {
                tracing::trace!("Progress receiver is gone");
            }
        }
    }
}
