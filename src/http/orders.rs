use super::extract::{JsonBody, PathParam, QueryParams};
use super::{Deleted, deleted};
use crate::auth::{AdminOnly, Authenticated, OptionalPrincipal};
use crate::error::AppError;
use crate::feed::{FeedEntry, FeedEvent};
use crate::model::{Order, OrderId, OrderStatus, OrderView};
use crate::services::{OrderFilters, PlaceOrder};
use crate::state::SharedState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

pub async fn list(
    State(state): State<SharedState>,
    Authenticated(principal): Authenticated,
    QueryParams(filters): QueryParams<OrderFilters>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(state.orders.list(&principal, filters).await?))
}

pub async fn place(
    State(state): State<SharedState>,
    OptionalPrincipal(principal): OptionalPrincipal,
    JsonBody(request): JsonBody<PlaceOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders.place(principal, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_status(
    State(state): State<SharedState>,
    Authenticated(principal): Authenticated,
    PathParam(id): PathParam<OrderId>,
    JsonBody(request): JsonBody<StatusRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(
        state
            .orders
            .update_status(id, &principal, request.status)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<SharedState>,
    AdminOnly(admin): AdminOnly,
    PathParam(id): PathParam<OrderId>,
) -> Result<Json<Deleted>, AppError> {
    state.orders.delete(id, &admin).await?;
    Ok(deleted("Order deleted"))
}

pub async fn events(
    State(state): State<SharedState>,
    Authenticated(principal): Authenticated,
    PathParam(id): PathParam<OrderId>,
) -> Result<Json<Vec<FeedEntry>>, AppError> {
    Ok(Json(state.orders.events(id, &principal).await?))
}

/// Only the chat messages of the order's feed.
pub async fn messages(
    State(state): State<SharedState>,
    Authenticated(principal): Authenticated,
    PathParam(id): PathParam<OrderId>,
) -> Result<Json<Vec<FeedEntry>>, AppError> {
    let entries = state.orders.events(id, &principal).await?;
    Ok(Json(
        entries
            .into_iter()
            .filter(|entry| matches!(entry.event, FeedEvent::Message { .. }))
            .collect(),
    ))
}

pub async fn post_message(
    State(state): State<SharedState>,
    Authenticated(principal): Authenticated,
    PathParam(id): PathParam<OrderId>,
    JsonBody(request): JsonBody<MessageRequest>,
) -> Result<(StatusCode, Json<FeedEntry>), AppError> {
    let entry = state
        .orders
        .post_message(id, &principal, &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
