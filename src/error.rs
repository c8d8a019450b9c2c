//! Service-level errors and their HTTP mapping.
//!
//! Actor errors (`AccountError`, `ProductError`, ...) are converted here so
//! handlers can use `?` on service calls. Bodies are `{"message": "..."}`.

use crate::account_actor::AccountError;
use crate::auth::TokenError;
use crate::counter_actor::CounterError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Account is blocked: {0}")]
    AccountBlocked(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken | AppError::InvalidRole(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) | AppError::AccountBlocked(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::NotFound(_) => AppError::NotFound("Account not found".into()),
            AccountError::AlreadyExists(login) => {
                AppError::Validation(format!("{login} is already registered"))
            }
            AccountError::ValidationError(msg) => AppError::Validation(msg),
            AccountError::ActorCommunicationError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ProductError> for AppError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(_) => AppError::NotFound("Product not found".into()),
            ProductError::ValidationError(msg) => AppError::Validation(msg),
            ProductError::ActorCommunicationError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => AppError::NotFound("Order not found".into()),
            OrderError::ProductNotFound(_) => AppError::NotFound("Product not found".into()),
            e @ OrderError::VendorMismatch { .. } => AppError::Conflict(e.to_string()),
            OrderError::ValidationError(msg) => AppError::Validation(msg),
            OrderError::ActorCommunicationError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(_) => AppError::InvalidToken,
            TokenError::InvalidRole(role) => AppError::InvalidRole(role),
            TokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

impl From<CounterError> for AppError {
    fn from(e: CounterError) -> Self {
        AppError::Internal(e.to_string())
    }
}
