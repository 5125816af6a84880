use crate::sender::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// Raised before any buffer access; queue state is untouched.
    #[error("no tracking ID")]
    MissingTrackingId,
    #[error("Serialization error: {0}")]
    Serialization(#[from] std::io::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{url} => HTTP status={status}, body: {body}")]
    Rejected {
        url: String,
        status: u16,
        body: String,
    },
}

impl QueueError {
    /// Errors that dropped already-buffered messages.
    pub fn is_send_failure(&self) -> bool {
        matches!(self, QueueError::Transport(_) | QueueError::Rejected { .. })
    }
}
