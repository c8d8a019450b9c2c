//! # Observability
//!
//! [`setup_tracing`] installs the process-wide subscriber. Actors log with an
//! `entity_type` field instead of module paths, so targets are hidden.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Created/Updated/Deleted lines
//! RUST_LOG=debug cargo run     # request payloads as well
//! RUST_LOG=resource_actor=debug,marketplace=info cargo run
//! ```
//!
//! With `RUST_LOG=info`, placing an order reads:
//!
//! ```text
//! INFO Action ok entity_type="Counter" id=counter_1
//! INFO Created entity_type="Order" id=order_3 size=3
//! ```

/// Initializes the global `tracing` subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once: later calls are ignored, which lets tests
/// that share a process each call it.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
