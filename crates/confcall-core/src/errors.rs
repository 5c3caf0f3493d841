use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session parameters: {0}")]
    InvalidParams(String),
    #[error("session is no longer mounted")]
    NotMounted,
    #[error("session has ended")]
    SessionEnded,
    #[error("unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("no tokio runtime available for session tasks")]
    NoRuntime,
    #[error("configuration error: {0}")]
    Config(String),
}
