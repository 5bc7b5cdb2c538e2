use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankWatchError>;

#[derive(Error, Debug)]
pub enum RankWatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Search API error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for RankWatchError {
    fn from(err: std::io::Error) -> Self {
        RankWatchError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RankWatchError {
    fn from(err: serde_json::Error) -> Self {
        RankWatchError::Storage(err.to_string())
    }
}
