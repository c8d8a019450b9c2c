//! Error types for the Order actor.

use crate::model::{AccountId, ProductId};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The ordered product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The vendor named in the order does not own the product.
    #[error("Vendor {vendor} does not sell {product}")]
    VendorMismatch { product: ProductId, vendor: AccountId },

    /// The order data provided is invalid.
    #[error("{0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
