use crate::CardId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid quality {0}: expected a rating from 0 to 5")]
    InvalidQuality(u8),
    #[error("card not found: {0}")]
    CardNotFound(CardId),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("answer has not been revealed")]
    AnswerNotRevealed,
    #[error("review session is finished")]
    SessionFinished,
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
