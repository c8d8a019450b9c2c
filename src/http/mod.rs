//! # HTTP API
//!
//! JSON over HTTP, multipart where files are uploaded. Authentication is
//! done by the extractors in [`crate::auth::guard`]; each handler names the
//! guard it needs.
//!
//! | Method | Path | Access |
//! |---|---|---|
//! | POST | `/api/auth/register` | public |
//! | POST | `/api/auth/register-customer` | public |
//! | POST | `/api/auth/login` | public |
//! | GET | `/api/products` | public |
//! | GET | `/api/products/all-products` | admin |
//! | GET | `/api/products/vendor/{vendor_id}` | public |
//! | GET | `/api/products/my-products` | vendor |
//! | POST | `/api/products` | vendor |
//! | PUT | `/api/products/{id}/approve` | admin |
//! | PUT, DELETE | `/api/products/{id}` | owning vendor |
//! | GET | `/api/vendors` | public |
//! | POST | `/api/vendors` | admin |
//! | PUT, DELETE | `/api/vendors/{id}` | admin |
//! | GET, POST | `/api/customers` | admin |
//! | PUT, DELETE | `/api/customers/{id}` | admin |
//! | PUT | `/api/customers/{id}/block`, `/api/customers/{id}/unblock` | admin |
//! | GET | `/api/orders` | any role, scoped |
//! | POST | `/api/orders` | public |
//! | PUT | `/api/orders/{id}/status` | admin or owning vendor |
//! | DELETE | `/api/orders/{id}` | admin |
//! | GET | `/api/orders/{id}/events`, `/api/orders/{id}/messages` | order participants |
//! | POST | `/api/orders/{id}/messages` | order participants |

pub mod auth;
pub mod customers;
pub mod extract;
pub mod orders;
pub mod products;
pub mod vendors;

use crate::state::SharedState;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

pub fn deleted(message: &'static str) -> Json<Deleted> {
    Json(Deleted { message })
}

/// Builds the API router, including CORS and the upload size limit.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(state.config.cors_max_age);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/auth/register", post(auth::register_vendor))
        .route("/api/auth/register-customer", post(auth::register_customer))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/products",
            get(products::list_approved).post(products::create),
        )
        .route("/api/products/all-products", get(products::list_all))
        .route("/api/products/my-products", get(products::my_products))
        .route(
            "/api/products/vendor/{vendor_id}",
            get(products::list_by_vendor),
        )
        .route("/api/products/{id}/approve", put(products::approve))
        .route(
            "/api/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/api/vendors", get(vendors::list).post(vendors::create))
        .route(
            "/api/vendors/{id}",
            put(vendors::update).delete(vendors::delete),
        )
        .route(
            "/api/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/api/customers/{id}",
            put(customers::update).delete(customers::delete),
        )
        .route("/api/customers/{id}/block", put(customers::block))
        .route("/api/customers/{id}/unblock", put(customers::unblock))
        .route("/api/orders", get(orders::list).post(orders::place))
        .route("/api/orders/{id}", axum::routing::delete(orders::delete))
        .route("/api/orders/{id}/status", put(orders::update_status))
        .route("/api/orders/{id}/events", get(orders::events))
        .route(
            "/api/orders/{id}/messages",
            get(orders::messages).post(orders::post_message),
        )
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}
