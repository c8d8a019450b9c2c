//! Named monotonic sequences. The `orders` counter numbers orders.

pub mod entity;
pub mod error;

pub use entity::CounterAction;
pub use error::*;

use crate::clients::CounterClient;
use crate::model::Counter;
use resource_actor::ResourceActor;

/// Creates a new Counter actor and its client. Run it with `()`.
pub fn new() -> (ResourceActor<Counter>, CounterClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    let client = CounterClient::new(generic_client);

    (actor, client)
}
