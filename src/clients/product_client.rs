use crate::model::{AccountId, Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductError};
use async_trait::async_trait;
use resource_actor::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<ProductError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self, product), fields(vendor_id = %product.vendor_id))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(product).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: ProductId) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, ProductAction::Approve)
            .await
            .map_err(Self::map_error)
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        self.list(Filter::all()).await
    }

    pub async fn list_approved(&self) -> Result<Vec<Product>, ProductError> {
        self.list(Filter::new(|p: &Product| p.approved)).await
    }

    /// Products owned by `vendor_id`; with `approved_only`, the public storefront.
    pub async fn list_by_vendor(
        &self,
        vendor_id: AccountId,
        approved_only: bool,
    ) -> Result<Vec<Product>, ProductError> {
        self.list(Filter::new(move |p: &Product| {
            p.vendor_id == vendor_id && (p.approved || !approved_only)
        }))
        .await
    }
}
