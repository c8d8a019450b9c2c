//! # Marketplace
//!
//! Backend of a multi-vendor marketplace: vendors list products with images
//! and videos, an admin approves them, and customers (or guests) place
//! orders that the admin and the selling vendor follow up on.
//!
//! ## Architecture
//!
//! Every resource kind lives in its own actor, built on the
//! [`resource_actor`] crate: a task owning an in-memory store and handling
//! requests one at a time, so there are no locks around entity state.
//!
//! | Layer | Modules |
//! |---|---|
//! | HTTP | [`http`], [`state`] |
//! | Access | [`auth`] |
//! | Business rules | [`services`], [`feed`], [`media`] |
//! | Actor clients | [`clients`] |
//! | Actors | [`account_actor`], [`product_actor`], [`order_actor`], [`counter_actor`] |
//! | Wiring | [`lifecycle`] |
//!
//! Control flow for an authenticated request: the guard extractor verifies
//! the bearer token, the handler calls a service, the service checks
//! ownership and calls the resource clients, and the actors answer.
//!
//! ## Cross-actor hooks
//!
//! Some rules need more than one actor. They are enforced inside entity
//! hooks that receive other actors' clients through their context:
//! - the order actor's `on_create` reads the product through the product
//!   client and numbers the order through the counter client
//! - account and product hooks delete replaced media through the
//!   [`MediaStore`](media::MediaStore)
//!
//! ## Running
//!
//! ```bash
//! JWT_SECRET=change-me ADMIN_EMAIL=admin@shop.test ADMIN_PASSWORD=secret \
//!     RUST_LOG=info cargo run
//! ```
//!
//! See [`config`] for every setting.

pub mod account_actor;
pub mod auth;
pub mod clients;
pub mod config;
pub mod counter_actor;
pub mod error;
pub mod feed;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod services;
pub mod state;

use std::io;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

use config::{Config, ConfigError};
use counter_actor::CounterError;
use error::AppError;
use lifecycle::{MarketplaceSystem, setup_tracing};
use media::MediaStore;
use state::State;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start actors: {0}")]
    Actors(#[from] CounterError),

    #[error("Failed to create admin account: {0}")]
    AdminSeed(#[from] AppError),
}

pub async fn start_server() -> Result<(), StartupError> {
    setup_tracing();

    let config = Config::load()?;

    info!("Initializing state...");
    let media = MediaStore::new(&config.uploads_dir);
    media.ensure_root().await?;
    let system = MarketplaceSystem::start(media.clone()).await?;
    let state = State::new(config, &system, media);

    if let Some(admin) = &state.config.admin {
        state
            .accounts
            .seed_admin(&admin.name, &admin.email, &admin.password)
            .await?;
    } else {
        warn!("No admin credentials configured");
    }

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = http::router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and its state are gone; the actors can drain
    if let Err(e) = system.shutdown().await {
        warn!("Unclean actor shutdown: {e}");
    }
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
