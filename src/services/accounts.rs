//! # Account Service
//!
//! Registration, login and the admin's vendor and customer management.
//! Passwords are hashed here; the account actor only ever sees hashes.

use crate::auth::{TokenIssuer, hash_password, verify_password};
use crate::clients::AccountClient;
use crate::error::AppError;
use crate::media::{MediaStore, Upload};
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate, Principal, Role, VendorSummary};
use resource_actor::ActorClient;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Vendor fields for registration and edits. On edit, `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// Customer fields for registration and edits. On edit, `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email for admins and vendors, phone number for customers.
    #[serde(alias = "email", alias = "phone")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user_id: AccountId,
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Hashes a new password if one was supplied and is not blank.
fn new_password_hash(password: Option<String>) -> Result<Option<String>, AppError> {
    password
        .filter(|p| !p.is_empty())
        .map(|p| hash_password(&p))
        .transpose()
}

#[derive(Clone)]
pub struct AccountService {
    accounts: AccountClient,
    tokens: TokenIssuer,
    media: MediaStore,
}

impl AccountService {
    pub fn new(accounts: AccountClient, tokens: TokenIssuer, media: MediaStore) -> Self {
        Self {
            accounts,
            tokens,
            media,
        }
    }

    /// The account with `id`, if it has `role`. Accounts of other roles are reported missing.
    async fn account_of_role(&self, id: AccountId, role: Role) -> Result<Account, AppError> {
        self.accounts
            .get(id)
            .await?
            .filter(|account| account.role == role)
            .ok_or_else(|| AppError::NotFound(format!("{} not found", capitalized(role))))
    }

    async fn save_logo(&self, logo: Option<Upload>) -> Result<Option<String>, AppError> {
        match logo {
            Some(upload) => self
                .media
                .save(&upload.file_name, &upload.bytes)
                .await
                .map(Some)
                .map_err(AppError::internal),
            None => Ok(None),
        }
    }

    async fn discard_logo(&self, logo: &Option<String>) {
        if let Some(name) = logo {
            self.media.remove(name).await;
        }
    }

    async fn fetch(&self, id: AccountId) -> Result<Account, AppError> {
        self.accounts
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".into()))
    }

    // --- Login ---

    /// Exchanges credentials for an access token.
    ///
    /// Unknown identifiers and wrong passwords fail the same way; a blocked
    /// account fails with its block reason once the password is verified.
    #[instrument(skip(self, request), fields(identifier = %request.identifier))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let Some(account) = self.accounts.find_login(&request.identifier).await? else {
            warn!("Login for unknown identifier");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(&request.password, &account.password_hash) {
            warn!(account_id = %account.id, "Wrong password");
            return Err(AppError::InvalidCredentials);
        }
        if account.blocked {
            warn!(account_id = %account.id, "Blocked account tried to log in");
            return Err(AppError::AccountBlocked(
                account.block_reason.unwrap_or_default(),
            ));
        }

        let principal = Principal::new(account.id, account.role);
        let token = self.tokens.issue(principal)?;
        info!(account_id = %account.id, role = %account.role, "Logged in");
        Ok(LoginResponse {
            token,
            role: account.role,
            user_id: account.id,
        })
    }

    /// Creates the admin account unless one already uses `email`.
    pub async fn seed_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<AccountId>, AppError> {
        if self.accounts.find_by_login(Role::Admin, email).await?.is_some() {
            info!(email, "Admin account already present");
            return Ok(None);
        }
        let id = self
            .accounts
            .create_account(AccountCreate {
                role: Role::Admin,
                name: name.to_string(),
                email: Some(email.to_string()),
                phone: None,
                password_hash: hash_password(password)?,
                description: None,
                logo: None,
                address: None,
            })
            .await?;
        info!(%id, email, "Admin account created");
        Ok(Some(id))
    }

    // --- Vendors ---

    pub async fn list_vendors(&self) -> Result<Vec<VendorSummary>, AppError> {
        Ok(self
            .accounts
            .list_by_role(Role::Vendor)
            .await?
            .iter()
            .map(VendorSummary::from)
            .collect())
    }

    /// Creates a vendor account. Used both for self-registration and by admins.
    #[instrument(skip(self, form, logo))]
    pub async fn create_vendor(
        &self,
        form: VendorForm,
        logo: Option<Upload>,
    ) -> Result<Account, AppError> {
        let name = required(form.name, "Name, email and password are required")?;
        let email = required(form.email, "Name, email and password are required")?;
        let password = required(form.password, "Name, email and password are required")?;
        let password_hash = hash_password(&password)?;

        let logo = self.save_logo(logo).await?;
        let created = self
            .accounts
            .create_account(AccountCreate {
                role: Role::Vendor,
                name,
                email: Some(email),
                phone: None,
                password_hash,
                description: form.description,
                logo: logo.clone(),
                address: form.address,
            })
            .await;
        match created {
            Ok(id) => self.fetch(id).await,
            Err(e) => {
                self.discard_logo(&logo).await;
                Err(e.into())
            }
        }
    }

    /// Partial vendor edit. A new logo replaces the stored file.
    #[instrument(skip(self, form, logo))]
    pub async fn update_vendor(
        &self,
        id: AccountId,
        form: VendorForm,
        logo: Option<Upload>,
    ) -> Result<Account, AppError> {
        self.account_of_role(id, Role::Vendor).await?;
        let password_hash = new_password_hash(form.password)?;
        let logo = self.save_logo(logo).await?;

        let update = AccountUpdate {
            name: form.name,
            email: form.email,
            phone: None,
            password_hash,
            description: form.description,
            logo: logo.clone(),
            address: form.address,
        };
        match self.accounts.update_account(id, update).await {
            Ok(account) => Ok(account),
            Err(e) => {
                self.discard_logo(&logo).await;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, id: AccountId) -> Result<(), AppError> {
        self.account_of_role(id, Role::Vendor).await?;
        self.accounts.delete(id).await?;
        Ok(())
    }

    // --- Customers ---

    pub async fn list_customers(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts.list_by_role(Role::Customer).await?)
    }

    /// Creates a customer account. Used both for self-registration and by admins.
    #[instrument(skip(self, form))]
    pub async fn create_customer(&self, form: CustomerForm) -> Result<Account, AppError> {
        let name = required(form.name, "Name, phone and password are required")?;
        let phone = required(form.phone, "Name, phone and password are required")?;
        let password = required(form.password, "Name, phone and password are required")?;

        let id = self
            .accounts
            .create_account(AccountCreate {
                role: Role::Customer,
                name,
                email: form.email,
                phone: Some(phone),
                password_hash: hash_password(&password)?,
                description: None,
                logo: None,
                address: form.address,
            })
            .await?;
        self.fetch(id).await
    }

    #[instrument(skip(self, form))]
    pub async fn update_customer(
        &self,
        id: AccountId,
        form: CustomerForm,
    ) -> Result<Account, AppError> {
        self.account_of_role(id, Role::Customer).await?;
        let update = AccountUpdate {
            name: form.name,
            email: form.email,
            phone: form.phone,
            password_hash: new_password_hash(form.password)?,
            address: form.address,
            ..Default::default()
        };
        Ok(self.accounts.update_account(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn block_customer(&self, id: AccountId, reason: &str) -> Result<Account, AppError> {
        self.account_of_role(id, Role::Customer).await?;
        Ok(self.accounts.block(id, reason.to_string()).await?)
    }

    #[instrument(skip(self))]
    pub async fn unblock_customer(&self, id: AccountId) -> Result<Account, AppError> {
        self.account_of_role(id, Role::Customer).await?;
        Ok(self.accounts.unblock(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: AccountId) -> Result<(), AppError> {
        self.account_of_role(id, Role::Customer).await?;
        self.accounts.delete(id).await?;
        Ok(())
    }
}

fn capitalized(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Vendor => "Vendor",
        Role::Customer => "Customer",
    }
}
