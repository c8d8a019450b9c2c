use super::extract::JsonBody;
use crate::error::AppError;
use crate::model::Account;
use crate::services::{CustomerForm, LoginRequest, LoginResponse, VendorForm};
use crate::state::SharedState;
use axum::{Json, extract::State, http::StatusCode};

pub async fn register_vendor(
    State(state): State<SharedState>,
    JsonBody(form): JsonBody<VendorForm>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.accounts.create_vendor(form, None).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn register_customer(
    State(state): State<SharedState>,
    JsonBody(form): JsonBody<CustomerForm>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.accounts.create_customer(form).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn login(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.accounts.login(request).await?))
}
