//! Vendor, admin and customer accounts.
//!
//! # Actor Framework
//! [`Account`] implements [`ActorEntity`](resource_actor::ActorEntity) in
//! [`crate::account_actor::entity`]; the login identifier is its unique key.

use crate::model::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Accounts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl From<u32> for AccountId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account_{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub role: Role,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The identifier this account logs in with: the phone number for
    /// customers, the email address for everyone else.
    pub fn login_identifier(&self) -> Option<&str> {
        match self.role {
            Role::Customer => self.phone.as_deref(),
            Role::Admin | Role::Vendor => self.email.as_deref(),
        }
    }

    /// Whether `identifier` names this account (email compared case-insensitively).
    pub fn answers_to(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(identifier))
            || self.phone.as_deref() == Some(identifier)
    }
}

/// Payload for creating a new account. The password is hashed by the caller.
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub role: Role,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
}

/// Partial update: `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
}

/// Public storefront view of a vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSummary {
    pub id: AccountId,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
}

impl From<&Account> for VendorSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            description: account.description.clone(),
            logo: account.logo.clone(),
        }
    }
}
