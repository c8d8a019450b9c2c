//! Product-specific resource logic, including approval and media validation.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::{MAX_IMAGES, MAX_VIDEOS};
pub use error::*;

use crate::clients::ProductClient;
use crate::model::Product;
use resource_actor::ResourceActor;

/// Creates a new Product actor and its client.
pub fn new() -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
