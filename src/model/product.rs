//! A product listed by a vendor.
//!
//! # Actor Framework
//! [`Product`] implements [`ActorEntity`](resource_actor::ActorEntity) in
//! [`crate::product_actor::entity`]:
//! - Creation parameters ([`ProductCreate`])
//! - Update parameters ([`ProductUpdate`])
//! - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))

use crate::model::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity_per_carton: u32,
    pub manufacturer: String,
    pub description: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub vendor_id: AccountId,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Stored media file names, images first.
    pub fn media(&self) -> impl Iterator<Item = &String> {
        self.images.iter().chain(self.videos.iter())
    }
}

/// Payload for creating a product.
///
/// Scalar attributes are optional here so that a missing field is reported
/// as a validation error by the entity rather than as a parse failure.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub vendor_id: AccountId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity_per_carton: Option<u32>,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

/// Partial update. Supplied media lists replace the stored lists.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity_per_carton: Option<u32>,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

/// Identifying fields of a product, embedded in order listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub vendor: Option<crate::model::VendorSummary>,
}
