use super::extract::{MultipartForm, PathParam};
use super::{Deleted, deleted};
use crate::auth::{AdminOnly, VendorOnly};
use crate::error::AppError;
use crate::model::{AccountId, Product, ProductId};
use crate::services::{MediaUploads, ProductAttrs};
use crate::state::SharedState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

fn product_form(mut form: MultipartForm) -> Result<(ProductAttrs, MediaUploads), AppError> {
    let attrs = ProductAttrs {
        name: form.text("name"),
        category: form.text("category"),
        price: form.parsed("price", "Price")?,
        quantity_per_carton: form.parsed("quantityPerCarton", "Quantity per carton")?,
        manufacturer: form.text("manufacturer"),
        description: form.text("description"),
    };
    let uploads = MediaUploads {
        images: form.take_files("images"),
        videos: form.take_files("videos"),
    };
    Ok((attrs, uploads))
}

pub async fn list_approved(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_approved().await?))
}

pub async fn list_all(
    State(state): State<SharedState>,
    _: AdminOnly,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_all().await?))
}

pub async fn list_by_vendor(
    State(state): State<SharedState>,
    PathParam(vendor_id): PathParam<AccountId>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_by_vendor(vendor_id, true).await?))
}

pub async fn my_products(
    State(state): State<SharedState>,
    VendorOnly(vendor): VendorOnly,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(
        state
            .catalog
            .list_by_vendor(vendor.account_id, false)
            .await?,
    ))
}

pub async fn create(
    State(state): State<SharedState>,
    VendorOnly(vendor): VendorOnly,
    form: MultipartForm,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let (attrs, uploads) = product_form(form)?;
    let product = state
        .catalog
        .create(vendor.account_id, attrs, uploads)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn approve(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.approve(id).await?))
}

pub async fn update(
    State(state): State<SharedState>,
    VendorOnly(vendor): VendorOnly,
    PathParam(id): PathParam<ProductId>,
    form: MultipartForm,
) -> Result<Json<Product>, AppError> {
    let (attrs, uploads) = product_form(form)?;
    Ok(Json(state.catalog.update(id, &vendor, attrs, uploads).await?))
}

pub async fn delete(
    State(state): State<SharedState>,
    VendorOnly(vendor): VendorOnly,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<Deleted>, AppError> {
    state.catalog.delete(id, &vendor).await?;
    Ok(deleted("Product deleted"))
}
