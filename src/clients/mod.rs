//! Type-safe wrappers around [`ResourceClient`](resource_actor::ResourceClient),
//! one per resource. Each maps framework errors back to its actor's error enum.

pub mod account_client;
pub mod counter_client;
pub mod order_client;
pub mod product_client;

pub use account_client::*;
pub use counter_client::*;
pub use order_client::*;
pub use product_client::*;
