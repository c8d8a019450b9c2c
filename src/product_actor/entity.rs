//! [`ActorEntity`] implementation for [`Product`].
//!
//! Required attributes and the media rules are checked when the product is
//! built and again on the record that results from every update.
//!
//! # Media rules
//! - at most [`MAX_IMAGES`] images and [`MAX_VIDEOS`] videos
//! - a product with videos must also have at least one image

use super::actions::ProductAction;
use super::error::ProductError;
use crate::media::MediaStore;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use resource_actor::ActorEntity;

pub const MAX_IMAGES: usize = 5;
pub const MAX_VIDEOS: usize = 3;

fn required<T>(value: Option<T>, field: &str) -> Result<T, ProductError> {
    value.ok_or_else(|| ProductError::ValidationError(format!("{field} is required")))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ProductError> {
    let value = required(value, field)?.trim().to_string();
    if value.is_empty() {
        return Err(ProductError::ValidationError(format!("{field} is required")));
    }
    Ok(value)
}

impl Product {
    fn validate(&self) -> Result<(), ProductError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ProductError::ValidationError(
                "Price must be a non-negative number".into(),
            ));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(ProductError::ValidationError(format!(
                "At most {MAX_IMAGES} images are allowed"
            )));
        }
        if self.videos.len() > MAX_VIDEOS {
            return Err(ProductError::ValidationError(format!(
                "At most {MAX_VIDEOS} videos are allowed"
            )));
        }
        if !self.videos.is_empty() && self.images.is_empty() {
            return Err(ProductError::ValidationError(
                "At least one image is required when uploading videos".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = Product;
    type Context = MediaStore;
    type Error = ProductError;

    /// Builds an unapproved product owned by `params.vendor_id`.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        let product = Self {
            id,
            name: required_text(params.name, "Name")?,
            category: required_text(params.category, "Category")?,
            price: required(params.price, "Price")?,
            quantity_per_carton: required(params.quantity_per_carton, "Quantity per carton")?,
            manufacturer: required_text(params.manufacturer, "Manufacturer")?,
            description: params.description.unwrap_or_default(),
            images: params.images,
            videos: params.videos,
            vendor_id: params.vendor_id,
            approved: false,
            created_at: chrono::Utc::now(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Replaces the supplied fields; supplied media lists replace the stored
    /// lists wholesale. Ownership and approval are untouched.
    async fn on_update(
        &mut self,
        update: ProductUpdate,
        _ctx: &MediaStore,
    ) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            self.name = required_text(Some(name), "Name")?;
        }
        if let Some(category) = update.category {
            self.category = required_text(Some(category), "Category")?;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity_per_carton {
            self.quantity_per_carton = quantity;
        }
        if let Some(manufacturer) = update.manufacturer {
            self.manufacturer = required_text(Some(manufacturer), "Manufacturer")?;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(videos) = update.videos {
            self.videos = videos;
        }
        self.validate()
    }

    async fn on_updated(&self, previous: &Self, media: &MediaStore) {
        let kept: Vec<&String> = self.media().collect();
        for file in previous.media().filter(|f| !kept.contains(f)) {
            media.remove(file).await;
        }
    }

    async fn on_delete(&self, media: &MediaStore) {
        media.remove_all(&self.images).await;
        media.remove_all(&self.videos).await;
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &MediaStore,
    ) -> Result<Product, ProductError> {
        match action {
            ProductAction::Approve => {
                self.approved = true;
                Ok(self.clone())
            }
        }
    }
}
