//! Order-specific resource logic and entity implementation.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use resource_actor::ResourceActor;

/// Creates a new Order actor and its client.
///
/// The actor depends on the product and counter actors; their clients are
/// passed in through [`OrderContext`] when the actor is run.
pub fn new() -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
