use crate::account_actor::{AccountAction, AccountError};
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate, Role};
use async_trait::async_trait;
use resource_actor::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Account actor.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<AccountError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => AccountError::NotFound(id),
            // Key is "<role>:<login>"; report only the login
            Err(FrameworkError::Conflict(key)) => AccountError::AlreadyExists(
                key.split_once(':')
                    .map_or(key.clone(), |(_, login)| login.to_string()),
            ),
            Err(other) => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl AccountClient {
    #[instrument(skip(self, account), fields(role = %account.role))]
    pub async fn create_account(&self, account: AccountCreate) -> Result<AccountId, AccountError> {
        debug!("Sending request");
        self.inner.create(account).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, update))]
    pub async fn update_account(
        &self,
        id: AccountId,
        update: AccountUpdate,
    ) -> Result<Account, AccountError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn block(&self, id: AccountId, reason: String) -> Result<Account, AccountError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, AccountAction::Block { reason })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn unblock(&self, id: AccountId) -> Result<Account, AccountError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, AccountAction::Unblock)
            .await
            .map_err(Self::map_error)
    }

    /// Every account holding `role`, in creation order.
    #[instrument(skip(self))]
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, AccountError> {
        self.list(Filter::new(move |account: &Account| account.role == role))
            .await
    }

    /// The account of `role` that logs in with `identifier`, if any.
    #[instrument(skip(self))]
    pub async fn find_by_login(
        &self,
        role: Role,
        identifier: &str,
    ) -> Result<Option<Account>, AccountError> {
        let identifier = identifier.to_string();
        let found = self
            .list(Filter::new(move |account: &Account| {
                account.role == role && account.answers_to(&identifier)
            }))
            .await?;
        Ok(found.into_iter().next())
    }

    /// The first account of any role that logs in with `identifier`.
    ///
    /// Roles are tried in admin, vendor, customer order.
    #[instrument(skip(self))]
    pub async fn find_login(&self, identifier: &str) -> Result<Option<Account>, AccountError> {
        for role in [Role::Admin, Role::Vendor, Role::Customer] {
            if let Some(account) = self.find_by_login(role, identifier).await? {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }
}
