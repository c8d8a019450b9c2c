//! # Access Guard
//!
//! Axum extractors that authenticate a request from its
//! `Authorization: Bearer <token>` header. Handlers name the guard they need
//! in their signature; a rejected request never reaches the handler body.
//!
//! | Extractor | Rejects with |
//! |---|---|
//! | [`Authenticated`] | 401 on a missing or bad token |
//! | [`AdminOnly`] / [`VendorOnly`] | as above, then 403 on the wrong role |
//! | [`OptionalPrincipal`] | 401 only if a header is present and bad |
//!
//! The extractors work with any router state from which a [`TokenIssuer`]
//! can be obtained through [`FromRef`].

use crate::auth::TokenIssuer;
use crate::error::AppError;
use crate::model::{AccountId, Order, Principal, Product, Role};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use tracing::debug;

pub struct Authenticated(pub Principal);

pub struct AdminOnly(pub Principal);

pub struct VendorOnly(pub Principal);

/// The caller's principal, or `None` for a guest.
pub struct OptionalPrincipal(pub Option<Principal>);

/// The bearer token of a request. `None` when no `Authorization` header is sent.
fn bearer_token(parts: &Parts) -> Option<Result<&str, AppError>> {
    let header = parts.headers.get(AUTHORIZATION)?;
    Some(
        header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthenticated),
    )
}

fn authenticate(parts: &Parts, tokens: &TokenIssuer) -> Result<Option<Principal>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    let principal = tokens.verify(token?).map_err(AppError::from)?;
    debug!(account_id = %principal.account_id, role = %principal.role, "Authenticated");
    Ok(Some(principal))
}

fn require_role(principal: Principal, role: Role) -> Result<Principal, AppError> {
    if principal.is(role) {
        Ok(principal)
    } else {
        Err(AppError::Forbidden(format!("{role} access required")))
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, &TokenIssuer::from_ref(state))?
            .map(Authenticated)
            .ok_or(AppError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
        require_role(principal, Role::Admin).map(AdminOnly)
    }
}

impl<S> FromRequestParts<S> for VendorOnly
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;
        require_role(principal, Role::Vendor).map(VendorOnly)
    }
}

impl<S> FromRequestParts<S> for OptionalPrincipal
where
    S: Send + Sync,
    TokenIssuer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, &TokenIssuer::from_ref(state)).map(OptionalPrincipal)
    }
}

/// A resource with an owning vendor.
pub trait Owned {
    /// Whether an admin may mutate the resource without owning it.
    const ADMIN_MAY_MUTATE: bool;

    fn owner(&self) -> AccountId;
}

impl Owned for Product {
    const ADMIN_MAY_MUTATE: bool = false;

    fn owner(&self) -> AccountId {
        self.vendor_id
    }
}

impl Owned for Order {
    const ADMIN_MAY_MUTATE: bool = true;

    fn owner(&self) -> AccountId {
        self.vendor_id
    }
}

/// Checked before every product and order mutation.
pub fn can_mutate<R: Owned>(principal: &Principal, resource: &R) -> bool {
    match principal.role {
        Role::Admin => R::ADMIN_MAY_MUTATE,
        Role::Vendor => resource.owner() == principal.account_id,
        Role::Customer => false,
    }
}
