//! Plain data structures. Each stored type implements
//! [`ActorEntity`](resource_actor::ActorEntity) in its `*_actor` module.

pub mod account;
pub mod counter;
pub mod order;
pub mod product;
pub mod role;

pub use account::*;
pub use counter::*;
pub use order::*;
pub use product::*;
pub use role::*;
