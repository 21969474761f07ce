use thiserror::Error as ThisError;

use crate::solver::Strategy;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("infeasible size: {stops} stops exceeds the {strategy} limit of {limit}")]
    InfeasibleSize {
        stops: usize,
        limit: usize,
        strategy: Strategy,
    },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn infeasible_size(stops: usize, limit: usize, strategy: Strategy) -> Self {
        Self::InfeasibleSize {
            stops,
            limit,
            strategy,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
