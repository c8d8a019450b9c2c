//! Custom actions for the Product actor.
//!
//! These are handled by
//! [`ActorEntity::handle_action`](resource_actor::ActorEntity::handle_action)
//! on [`Product`](crate::model::Product).

/// Custom actions for Product entities.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Marks the product approved, making it publicly visible.
    ///
    /// Approving an approved product is a no-op. Returns the stored product.
    Approve,
}
