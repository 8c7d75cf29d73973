use thiserror::Error;

use crate::storage::RetrievalError;

/// Error type shared by the projection, aggregation and trend services.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
