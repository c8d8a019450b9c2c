//! # ActorEntity Trait
//!
//! The contract every stored resource (account, product, order, counter)
//! implements to be managed by the generic [`ResourceActor`](crate::ResourceActor).
//! Associated types pin down the ID, the DTOs, the custom actions, the injected
//! context and the error of each resource, so a product payload can never be
//! sent to the account actor.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_updated`]
//! - [`ActorEntity::on_delete`]
//! - [`ActorEntity::unique_key`]
//!
//! The defaults do nothing.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are async so they can call other actors. The `Context` is injected
/// when the actor starts (`run(context)`), not when it is constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation, and ordered so
    /// listings come back in creation order.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `Approve`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: clients match on a
    /// single `ProductError`, at the cost of some variants being impossible
    /// for some operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Key that must be unique among all stored entities of this type.
    ///
    /// Checked by the actor after `on_create` and after every update, with the
    /// entity being updated excluded from the comparison.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is built and before it is stored.
    /// Failing here aborts the create.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update to a working copy of the entity.
    ///
    /// The copy replaces the stored entity only if this returns `Ok` and the
    /// uniqueness check passes, so side effects belong in [`on_updated`](Self::on_updated).
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called once an update has been committed, with the replaced state.
    async fn on_updated(&self, _previous: &Self, _ctx: &Self::Context) {}

    /// Called after the entity has been removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) {}

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
