//! Customer orders.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](resource_actor::ActorEntity) in
//! [`crate::order_actor::entity`]. Its `on_create` hook checks the product
//! and draws the order number from the `orders` counter.

use crate::model::{AccountId, ProductId, ProductSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Display image used when an order is placed without one.
pub const PLACEHOLDER_IMAGE: &str = "placeholder.png";

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Rejected,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
        })
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(format!("Unknown order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order number, assigned from the `orders` counter.
    pub number: u64,
    pub product_id: ProductId,
    pub vendor_id: AccountId,
    /// `None` for guest orders.
    pub customer_id: Option<AccountId>,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub quantity: u32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub image: String,
}

/// Payload for placing an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub product_id: ProductId,
    pub vendor_id: AccountId,
    pub customer_id: Option<AccountId>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub quantity: u32,
    pub image: Option<String>,
}

/// An order as listed to a user, with its product and vendor resolved.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub product: Option<ProductSummary>,
}
