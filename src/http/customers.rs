use super::extract::{JsonBody, PathParam};
use super::{Deleted, deleted};
use crate::auth::AdminOnly;
use crate::error::AppError;
use crate::model::{Account, AccountId};
use crate::services::CustomerForm;
use crate::state::SharedState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    #[serde(default)]
    pub reason: String,
}

pub async fn list(
    State(state): State<SharedState>,
    _: AdminOnly,
) -> Result<Json<Vec<Account>>, AppError> {
    Ok(Json(state.accounts.list_customers().await?))
}

pub async fn create(
    State(state): State<SharedState>,
    _: AdminOnly,
    JsonBody(form): JsonBody<CustomerForm>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.accounts.create_customer(form).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
    JsonBody(form): JsonBody<CustomerForm>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(state.accounts.update_customer(id, form).await?))
}

pub async fn block(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
    JsonBody(request): JsonBody<BlockRequest>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(state.accounts.block_customer(id, &request.reason).await?))
}

pub async fn unblock(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(state.accounts.unblock_customer(id).await?))
}

pub async fn delete(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
) -> Result<Json<Deleted>, AppError> {
    state.accounts.delete_customer(id).await?;
    Ok(deleted("Customer deleted"))
}
