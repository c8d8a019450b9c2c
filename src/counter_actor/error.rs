//! Error types for the Counter actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CounterError {
    #[error("Counter not found: {0}")]
    NotFound(String),

    #[error("Counter already exists: {0}")]
    AlreadyExists(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CounterError {
    fn from(msg: String) -> Self {
        CounterError::ActorCommunicationError(msg)
    }
}
