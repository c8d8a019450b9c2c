use crate::counter_actor::{CounterAction, CounterError};
use crate::model::{Counter, CounterCreate, CounterId};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Counter actor.
#[derive(Clone)]
pub struct CounterClient {
    inner: ResourceClient<Counter>,
}

impl CounterClient {
    pub fn new(inner: ResourceClient<Counter>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_counter(&self, name: &str) -> Result<CounterId, CounterError> {
        debug!("Sending request");
        self.inner
            .create(CounterCreate {
                name: name.to_string(),
            })
            .await
            .map_err(Self::map_error)
    }

    /// Advances the counter and returns its new value.
    #[instrument(skip(self))]
    pub async fn next(&self, id: CounterId) -> Result<u64, CounterError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, CounterAction::Next)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Counter> for CounterClient {
    type Error = CounterError;

    fn inner(&self) -> &ResourceClient<Counter> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CounterError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CounterError::NotFound(id),
            Err(FrameworkError::Conflict(name)) => CounterError::AlreadyExists(name),
            Err(other) => CounterError::ActorCommunicationError(other.to_string()),
        }
    }
}
