//! # Resource Actor
//!
//! Building blocks for type-safe resource stores served by actors. Each
//! resource type (accounts, products, orders, ...) gets one
//! [`ResourceActor`] that owns its entities and processes requests one at a
//! time; everything else talks to it through a cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the resource's data and business rules,
//!    expressed as lifecycle hooks.
//! 2. **Runtime** ([`ResourceActor`]): the message loop, the ordered store,
//!    ID generation and uniqueness checks.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed async calls.
//!
//! ## Operations
//!
//! Create, Get, List (with a [`Filter`] evaluated inside the actor), Update,
//! Delete and a per-entity Action. Entity errors come back boxed in
//! [`FrameworkError::EntityError`] and are recovered with
//! [`FrameworkError::downcast_entity`].
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`ResourceActor::run`], not to the constructor,
//! so actors that call each other can all be created before any of them
//! starts.
//!
//! ```rust
//! use resource_actor::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Item { id: u32, stock: u32 }
//! #[derive(Debug)] struct ItemCreate { stock: u32 }
//! #[derive(Debug)] struct ItemUpdate;
//! #[derive(Debug)] enum ItemAction {}
//! #[derive(Debug, thiserror::Error)] #[error("item error")] struct ItemError;
//!
//! #[async_trait]
//! impl ActorEntity for Item {
//!     type Id = u32; type Create = ItemCreate; type Update = ItemUpdate; type Action = ItemAction;
//!     type ActionResult = (); type Context = (); type Error = ItemError;
//!     fn from_create_params(id: u32, p: ItemCreate) -> Result<Self, Self::Error> { Ok(Self { id, stock: p.stock }) }
//!     async fn on_update(&mut self, _: ItemUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: ItemAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[derive(Clone, Debug)] struct Basket { id: u32 }
//! #[derive(Debug)] struct BasketCreate { item: u32 }
//! #[derive(Debug)] struct BasketUpdate;
//! #[derive(Debug)] enum BasketAction {}
//! #[derive(Debug, thiserror::Error)] #[error("unknown item")] struct BasketError;
//!
//! #[async_trait]
//! impl ActorEntity for Basket {
//!     type Id = u32; type Create = BasketCreate; type Update = BasketUpdate; type Action = BasketAction;
//!     type ActionResult = (); type Context = ResourceClient<Item>; type Error = BasketError;
//!     fn from_create_params(id: u32, _: BasketCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: BasketUpdate, _: &Self::Context) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: BasketAction, _: &Self::Context) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (item_actor, items) = ResourceActor::<Item>::new(10);
//!     let (basket_actor, baskets) = ResourceActor::<Basket>::new(10);
//!
//!     tokio::spawn(item_actor.run(()));
//!     tokio::spawn(basket_actor.run(items.clone()));
//!
//!     let item = items.create(ItemCreate { stock: 3 }).await.unwrap();
//!     baskets.create(BasketCreate { item }).await.unwrap();
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient` from scripted
//! expectations, so an actor can be tested with its dependencies mocked.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
