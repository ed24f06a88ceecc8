use thiserror::Error;

use crate::session::SessionState;

/// Recoverable per-event failures. None of these touch shared state or end
/// the connection; the transport logs them and moves on.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("event not accepted while session is {0:?}")]
    InvalidState(SessionState),
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Malformed(e.to_string())
    }
}
