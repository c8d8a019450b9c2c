//! # Catalog Service
//!
//! Product listing and vendor-owned product management. Uploaded media is
//! written to disk before the product actor sees the record; if the actor
//! rejects it, the files are removed again.

use crate::auth::can_mutate;
use crate::clients::ProductClient;
use crate::error::AppError;
use crate::media::{MediaStore, Upload};
use crate::model::{AccountId, Principal, Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{MAX_IMAGES, MAX_VIDEOS};
use resource_actor::ActorClient;
use tracing::{info, instrument};

/// Scalar product attributes as submitted by a vendor.
#[derive(Debug, Clone, Default)]
pub struct ProductAttrs {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity_per_carton: Option<u32>,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaUploads {
    pub images: Vec<Upload>,
    pub videos: Vec<Upload>,
}

impl MediaUploads {
    fn check_limits(&self) -> Result<(), AppError> {
        if self.images.len() > MAX_IMAGES {
            return Err(AppError::Validation(format!(
                "At most {MAX_IMAGES} images are allowed"
            )));
        }
        if self.videos.len() > MAX_VIDEOS {
            return Err(AppError::Validation(format!(
                "At most {MAX_VIDEOS} videos are allowed"
            )));
        }
        Ok(())
    }
}

/// File names of a saved [`MediaUploads`].
struct SavedMedia {
    images: Vec<String>,
    videos: Vec<String>,
}

const NOT_FOUND_OR_FORBIDDEN: &str = "Product not found or access denied";

#[derive(Clone)]
pub struct CatalogService {
    products: ProductClient,
    media: MediaStore,
}

impl CatalogService {
    pub fn new(products: ProductClient, media: MediaStore) -> Self {
        Self { products, media }
    }

    pub async fn list_approved(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list_approved().await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list_all().await?)
    }

    /// The public storefront of a vendor (`approved_only`) or their own dashboard.
    pub async fn list_by_vendor(
        &self,
        vendor_id: AccountId,
        approved_only: bool,
    ) -> Result<Vec<Product>, AppError> {
        Ok(self
            .products
            .list_by_vendor(vendor_id, approved_only)
            .await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, AppError> {
        Ok(self.products.get(id).await?)
    }

    async fn save_media(&self, uploads: &MediaUploads) -> Result<SavedMedia, AppError> {
        uploads.check_limits()?;
        let images = self
            .media
            .save_all(&uploads.images)
            .await
            .map_err(AppError::internal)?;
        let videos = match self.media.save_all(&uploads.videos).await {
            Ok(videos) => videos,
            Err(e) => {
                self.media.remove_all(&images).await;
                return Err(AppError::internal(e));
            }
        };
        Ok(SavedMedia { images, videos })
    }

    async fn discard(&self, saved: &SavedMedia) {
        self.media.remove_all(&saved.images).await;
        self.media.remove_all(&saved.videos).await;
    }

    /// Creates an unapproved product owned by `vendor_id`.
    #[instrument(skip(self, attrs, uploads))]
    pub async fn create(
        &self,
        vendor_id: AccountId,
        attrs: ProductAttrs,
        uploads: MediaUploads,
    ) -> Result<Product, AppError> {
        let saved = self.save_media(&uploads).await?;
        let params = ProductCreate {
            vendor_id,
            name: attrs.name,
            category: attrs.category,
            price: attrs.price,
            quantity_per_carton: attrs.quantity_per_carton,
            manufacturer: attrs.manufacturer,
            description: attrs.description,
            images: saved.images.clone(),
            videos: saved.videos.clone(),
        };

        let id = match self.products.create_product(params).await {
            Ok(id) => id,
            Err(e) => {
                self.discard(&saved).await;
                return Err(e.into());
            }
        };
        info!(%id, "Product submitted for approval");
        self.products
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))
    }

    pub async fn approve(&self, id: ProductId) -> Result<Product, AppError> {
        Ok(self.products.approve(id).await?)
    }

    /// The product, if `principal` may change it. Absent and not-yours look the same.
    async fn owned(&self, id: ProductId, principal: &Principal) -> Result<Product, AppError> {
        self.products
            .get(id)
            .await?
            .filter(|product| can_mutate(principal, product))
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_OR_FORBIDDEN.into()))
    }

    /// Replaces the supplied attributes. Uploaded images replace all stored
    /// images, uploaded videos all stored videos.
    #[instrument(skip(self, attrs, uploads))]
    pub async fn update(
        &self,
        id: ProductId,
        principal: &Principal,
        attrs: ProductAttrs,
        uploads: MediaUploads,
    ) -> Result<Product, AppError> {
        self.owned(id, principal).await?;
        let saved = self.save_media(&uploads).await?;
        let update = ProductUpdate {
            name: attrs.name,
            category: attrs.category,
            price: attrs.price,
            quantity_per_carton: attrs.quantity_per_carton,
            manufacturer: attrs.manufacturer,
            description: attrs.description,
            images: (!saved.images.is_empty()).then(|| saved.images.clone()),
            videos: (!saved.videos.is_empty()).then(|| saved.videos.clone()),
        };

        match self.products.update_product(id, update).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.discard(&saved).await;
                Err(e.into())
            }
        }
    }

    /// Removes the product; its media files go with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId, principal: &Principal) -> Result<(), AppError> {
        self.owned(id, principal).await?;
        self.products.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploads(images: usize, videos: usize) -> MediaUploads {
        let file = |name: &str| Upload {
            file_name: name.to_string(),
            bytes: vec![1],
        };
        MediaUploads {
            images: (0..images).map(|_| file("a.png")).collect(),
            videos: (0..videos).map(|_| file("a.mp4")).collect(),
        }
    }

    #[test]
    fn limits_allow_five_images_and_three_videos() {
        assert!(uploads(MAX_IMAGES, MAX_VIDEOS).check_limits().is_ok());
        assert!(matches!(
            uploads(MAX_IMAGES + 1, 0).check_limits(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            uploads(1, MAX_VIDEOS + 1).check_limits(),
            Err(AppError::Validation(_))
        ));
    }
}
