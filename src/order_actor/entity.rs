//! [`ActorEntity`] implementation for [`Order`].
//!
//! `on_create` reaches into other actors through [`OrderContext`]: it checks
//! that the product exists and belongs to the named vendor, then draws the
//! order number from the `orders` counter. The number is only consumed once
//! the order has passed every check.

use super::actions::{OrderAction, StatusChange};
use super::error::OrderError;
use crate::clients::{CounterClient, ProductClient};
use crate::model::{CounterId, Order, OrderCreate, OrderId, OrderStatus, PLACEHOLDER_IMAGE};
use async_trait::async_trait;
use resource_actor::{ActorClient, ActorEntity};
use tracing::debug;

/// Dependencies injected into the Order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub products: ProductClient,
    pub counters: CounterClient,
    /// The counter that numbers orders.
    pub counter_id: CounterId,
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = StatusChange;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.quantity < 1 {
            return Err(OrderError::ValidationError(
                "Quantity must be at least 1".into(),
            ));
        }
        Ok(Self {
            id,
            number: 0,
            product_id: params.product_id,
            vendor_id: params.vendor_id,
            customer_id: params.customer_id,
            customer_name: params.customer_name.unwrap_or_default(),
            phone: params.phone.unwrap_or_default(),
            address: params.address.unwrap_or_default(),
            quantity: params.quantity,
            status: OrderStatus::Pending,
            created_at: chrono::Utc::now(),
            image: params
                .image
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        })
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let product = ctx
            .products
            .get(self.product_id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?
            .ok_or(OrderError::ProductNotFound(self.product_id))?;

        if product.vendor_id != self.vendor_id {
            return Err(OrderError::VendorMismatch {
                product: self.product_id,
                vendor: self.vendor_id,
            });
        }

        self.number = ctx
            .counters
            .next(ctx.counter_id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        debug!(order_id = %self.id, number = self.number, "Order number assigned");
        Ok(())
    }

    /// Orders have no editable fields; status moves through [`OrderAction`].
    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), OrderError> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &OrderContext,
    ) -> Result<StatusChange, OrderError> {
        match action {
            OrderAction::SetStatus(status) => {
                let previous = std::mem::replace(&mut self.status, status);
                Ok(StatusChange {
                    order: self.clone(),
                    previous,
                })
            }
        }
    }
}
