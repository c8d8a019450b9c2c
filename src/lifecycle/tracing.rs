//! # Observability & Tracing
//!
//! Every actor logs through `tracing` with an `entity_type` field instead of
//! a module path, so the subscriber hides targets.
//!
//! ```bash
//! # Lifecycle events only
//! RUST_LOG=info cargo run
//!
//! # Payloads, feed publications and guard decisions
//! RUST_LOG=debug cargo run
//! ```
//!
//! Placing a guest order with `RUST_LOG=info`:
//!
//! ```text
//! INFO place_order{product_id=product_1}: Sending place_order to actor
//! INFO Action ok entity_type="Counter" id=counter_1
//! INFO Created entity_type="Order" id=order_1 size=1
//! ```
//!
//! With `RUST_LOG=debug` the product lookup made by the order actor's
//! `on_create` hook shows up as well:
//!
//! ```text
//! DEBUG place_order called order=OrderCreate { product_id: ProductId(1), .. }
//! DEBUG Get entity_type="Product" id=product_1 found=true
//! DEBUG Order number assigned order_id=order_1 number=1
//! ```

pub use resource_actor::tracing::setup_tracing;
