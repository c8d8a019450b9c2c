use super::extract::{MultipartForm, PathParam};
use super::{Deleted, deleted};
use crate::auth::AdminOnly;
use crate::error::AppError;
use crate::model::{Account, AccountId, VendorSummary};
use crate::services::VendorForm;
use crate::state::SharedState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

fn vendor_form(form: &MultipartForm) -> VendorForm {
    VendorForm {
        name: form.text("name"),
        email: form.text("email"),
        password: form.text("password"),
        description: form.text("description"),
        address: form.text("address"),
    }
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<VendorSummary>>, AppError> {
    Ok(Json(state.accounts.list_vendors().await?))
}

pub async fn create(
    State(state): State<SharedState>,
    _: AdminOnly,
    mut form: MultipartForm,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let logo = form.take_file("logo");
    let account = state.accounts.create_vendor(vendor_form(&form), logo).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
    mut form: MultipartForm,
) -> Result<Json<Account>, AppError> {
    let logo = form.take_file("logo");
    Ok(Json(
        state
            .accounts
            .update_vendor(id, vendor_form(&form), logo)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<SharedState>,
    _: AdminOnly,
    PathParam(id): PathParam<AccountId>,
) -> Result<Json<Deleted>, AppError> {
    state.accounts.delete_vendor(id).await?;
    Ok(deleted("Vendor deleted"))
}
