use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity {0} not found")]
    EntityNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TrackerError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
