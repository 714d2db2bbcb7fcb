use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates outside the board")]
    InvalidCoordinate,
    #[error("invalid board configuration")]
    InvalidConfiguration,
}

pub type Result<T> = std::result::Result<T, GameError>;
