use meetgraph_core::NormalizeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeetupError>;

#[derive(Debug, Error)]
pub enum MeetupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    Malformed(#[from] NormalizeError),
}

impl From<reqwest::Error> for MeetupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MeetupError::Parse(err.to_string())
        } else {
            MeetupError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MeetupError {
    fn from(err: serde_json::Error) -> Self {
        MeetupError::Parse(err.to_string())
    }
}
