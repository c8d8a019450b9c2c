//! [`ActorEntity`] implementation for [`Account`].
//!
//! The unique key is `"<role>:<login identifier>"`, lowercased, so a vendor
//! and a customer may share an email address but two vendors may not.
//! The context is the [`MediaStore`]: vendor logos that are replaced or
//! orphaned by a delete are removed from disk.

use super::actions::AccountAction;
use super::error::AccountError;
use crate::media::MediaStore;
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate, Role};
use async_trait::async_trait;
use resource_actor::ActorEntity;

/// Trims a value and maps blank strings to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Account {
    fn validate(&self) -> Result<(), AccountError> {
        if self.name.trim().is_empty() {
            return Err(AccountError::ValidationError("Name is required".into()));
        }
        match self.role {
            Role::Customer if self.phone.is_none() => Err(AccountError::ValidationError(
                "Phone number is required".into(),
            )),
            Role::Admin | Role::Vendor if self.email.is_none() => {
                Err(AccountError::ValidationError("Email is required".into()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Action = AccountAction;
    type ActionResult = Account;
    type Context = MediaStore;
    type Error = AccountError;

    fn from_create_params(id: AccountId, params: AccountCreate) -> Result<Self, AccountError> {
        let account = Self {
            id,
            role: params.role,
            name: params.name.trim().to_string(),
            email: non_blank(params.email).map(|e| e.to_lowercase()),
            phone: non_blank(params.phone),
            password_hash: params.password_hash,
            description: non_blank(params.description),
            logo: params.logo,
            address: non_blank(params.address),
            blocked: false,
            block_reason: None,
            created_at: chrono::Utc::now(),
        };
        account.validate()?;
        Ok(account)
    }

    fn unique_key(&self) -> Option<String> {
        self.login_identifier()
            .map(|login| format!("{}:{}", self.role, login.to_lowercase()))
    }

    /// Applies the supplied fields. The role never changes.
    async fn on_update(
        &mut self,
        update: AccountUpdate,
        _ctx: &MediaStore,
    ) -> Result<(), AccountError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = non_blank(update.email) {
            self.email = Some(email.to_lowercase());
        }
        if let Some(phone) = non_blank(update.phone) {
            self.phone = Some(phone);
        }
        if let Some(hash) = update.password_hash {
            self.password_hash = hash;
        }
        if let Some(description) = update.description {
            self.description = non_blank(Some(description));
        }
        if let Some(logo) = update.logo {
            self.logo = Some(logo);
        }
        if let Some(address) = update.address {
            self.address = non_blank(Some(address));
        }
        self.validate()
    }

    async fn on_updated(&self, previous: &Self, media: &MediaStore) {
        if let Some(old_logo) = &previous.logo {
            if self.logo.as_ref() != Some(old_logo) {
                media.remove(old_logo).await;
            }
        }
    }

    async fn on_delete(&self, media: &MediaStore) {
        if let Some(logo) = &self.logo {
            media.remove(logo).await;
        }
    }

    async fn handle_action(
        &mut self,
        action: AccountAction,
        _ctx: &MediaStore,
    ) -> Result<Account, AccountError> {
        match action {
            AccountAction::Block { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(AccountError::ValidationError(
                        "A reason is required to block an account".into(),
                    ));
                }
                self.blocked = true;
                self.block_reason = Some(reason.to_string());
            }
            AccountAction::Unblock => {
                self.blocked = false;
                self.block_reason = None;
            }
        }
        Ok(self.clone())
    }
}
