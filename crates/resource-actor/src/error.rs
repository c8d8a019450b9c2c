//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity-specific failures travel
//! boxed inside [`FrameworkError::EntityError`] and are recovered by the
//! resource clients with [`FrameworkError::downcast_entity`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Another entity already holds the same [`unique_key`](crate::ActorEntity::unique_key).
    #[error("Duplicate key: {0}")]
    Conflict(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error `E` carried by an `EntityError`.
    ///
    /// Any other variant, or an entity error of a different type, is handed
    /// back unchanged so the caller can map it to its own fallback.
    pub fn downcast_entity<E>(self) -> Result<E, Self>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }
}
