use crate::model::{Order, OrderCreate, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderError, StatusChange};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Product and vendor validation happen in the Order actor's `on_create` hook.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, order), fields(product_id = %order.product_id))]
    pub async fn place_order(&self, order: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?order, "place_order called");
        info!("Sending place_order to actor");
        self.inner.create(order).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::SetStatus(status))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
