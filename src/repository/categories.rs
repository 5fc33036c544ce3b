use std::sync::Arc;

use crate::cache::CacheKeys;
use crate::error::{AppError, Result};
use crate::images::{ImageHost, CATEGORY_FOLDER};
use crate::models::{
    Category, CategoryChanges, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
use crate::repository::{CacheAside, Fetched};
use crate::store::CategoryStore;

/// Cache-aside repository for categories.
///
/// Category images live on the image host. An upload always completes before
/// the store write, and an image orphaned by a failed write or a replacement
/// is removed best-effort.
#[derive(Clone)]
pub struct CategoryRepository {
    store: Arc<dyn CategoryStore>,
    images: Arc<dyn ImageHost>,
    cache: CacheAside,
    keys: CacheKeys,
}

impl CategoryRepository {
    pub fn new(
        store: Arc<dyn CategoryStore>,
        images: Arc<dyn ImageHost>,
        cache: CacheAside,
        keys: CacheKeys,
    ) -> Self {
        Self {
            store,
            images,
            cache,
            keys,
        }
    }

    pub async fn list(&self) -> Result<Fetched<Vec<Category>>> {
        let store = &self.store;
        self.cache
            .fetch_collection(&self.keys.categories(), || store.find_categories())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Fetched<Category>> {
        let store = &self.store;
        self.cache
            .fetch(&self.keys.category(id), || store.find_category(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn create(&self, request: &CreateCategoryRequest) -> Result<Category> {
        let image = self
            .images
            .upload(request.image_data_uri.trim(), CATEGORY_FOLDER)
            .await?;

        let created = self
            .store
            .create_category(NewCategory {
                name: request.name.trim().to_string(),
                description: non_blank(request.description.as_deref()),
                is_active: request.is_active,
                image_url: image.secure_url,
                image_public_id: image.public_id.clone(),
            })
            .await;

        let category = match created {
            Ok(category) => category,
            Err(err) => {
                self.discard_image(&image.public_id).await;
                return Err(err.into());
            }
        };

        self.invalidate(&category.id).await?;
        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Applies the non-blank fields; a new image replaces the old one.
    pub async fn update(&self, id: &str, request: &UpdateCategoryRequest) -> Result<Category> {
        let current = self
            .store
            .find_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let image = match request.image_data_uri() {
            Some(uri) => Some(self.images.upload(uri.trim(), CATEGORY_FOLDER).await?),
            None => None,
        };

        let changes = CategoryChanges {
            name: request.name().map(|n| n.trim().to_string()),
            description: request.description().map(|d| d.trim().to_string()),
            is_active: request.is_active,
            image_url: image.as_ref().map(|i| i.secure_url.clone()),
            image_public_id: image.as_ref().map(|i| i.public_id.clone()),
        };

        let category = match self.store.update_category(id, changes).await {
            Ok(category) => category,
            Err(err) => {
                if let Some(image) = &image {
                    self.discard_image(&image.public_id).await;
                }
                return Err(err.into());
            }
        };

        let invalidated = self.invalidate(id).await;
        if image.is_some() && current.image_public_id != category.image_public_id {
            self.discard_image(&current.image_public_id).await;
        }
        invalidated?;

        tracing::info!(category_id = %id, "Category updated");
        Ok(category)
    }

    pub async fn delete(&self, id: &str) -> Result<Category> {
        let category = self.store.delete_category(id).await?;

        let invalidated = self.invalidate(id).await;
        self.discard_image(&category.image_public_id).await;
        invalidated?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(category)
    }

    async fn discard_image(&self, public_id: &str) {
        if let Err(err) = self.images.destroy(public_id).await {
            tracing::warn!(public_id = %public_id, error = %err, "Failed to remove image");
        }
    }

    async fn invalidate(&self, id: &str) -> Result<()> {
        self.cache
            .invalidate(&[self.keys.category(id), self.keys.categories()])
            .await
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
