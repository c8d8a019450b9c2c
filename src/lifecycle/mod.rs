//! Actor startup, wiring and shutdown.

pub mod marketplace_system;
pub mod tracing;

pub use marketplace_system::MarketplaceSystem;
pub use tracing::setup_tracing;
