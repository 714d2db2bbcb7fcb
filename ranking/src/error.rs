use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("remote ranking error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, RankingError>;
