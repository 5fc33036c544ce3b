use std::sync::Arc;

use crate::cache::CacheKeys;
use crate::error::{AppError, Result};
use crate::models::{CreateProductRequest, NewProduct, Product, ProductChanges, UpdateProductRequest};
use crate::repository::{CacheAside, Fetched};
use crate::slug::{derive_slug, unique_slug};
use crate::store::ProductStore;

/// Cache-aside repository for products.
///
/// Reads go through `swift-cart:products` and `swift-cart:product:{id}`;
/// every write removes the touched product's key and the list key.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn ProductStore>,
    cache: CacheAside,
    keys: CacheKeys,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn ProductStore>, cache: CacheAside, keys: CacheKeys) -> Self {
        Self { store, cache, keys }
    }

    pub async fn list(&self) -> Result<Fetched<Vec<Product>>> {
        let store = &self.store;
        self.cache
            .fetch_collection(&self.keys.products(), || store.find_products())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Fetched<Product>> {
        let store = &self.store;
        self.cache
            .fetch(&self.keys.product(id), || store.find_product(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn create(&self, request: &CreateProductRequest) -> Result<Product> {
        let name = request.name.trim();
        let slug = self.next_slug(name, None).await?;

        let product = self
            .store
            .create_product(NewProduct {
                name: name.to_string(),
                slug,
                description: request.description.trim().to_string(),
                category_id: request.category_id.trim().to_string(),
            })
            .await?;

        self.invalidate(&product.id).await?;
        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    /// Applies the non-blank fields. A new name also regenerates the slug.
    pub async fn update(&self, id: &str, request: &UpdateProductRequest) -> Result<Product> {
        let slug = match request.name() {
            Some(name) => Some(self.next_slug(name.trim(), Some(id)).await?),
            None => None,
        };

        let changes = ProductChanges {
            name: request.name().map(|n| n.trim().to_string()),
            slug,
            description: request.description().map(|d| d.trim().to_string()),
            category_id: request.category_id().map(|c| c.trim().to_string()),
        };
        let product = self.store.update_product(id, changes).await?;

        self.invalidate(id).await?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> Result<Product> {
        let product = self.store.delete_product(id).await?;

        self.invalidate(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(product)
    }

    async fn next_slug(&self, name: &str, exclude_id: Option<&str>) -> Result<String> {
        let base = derive_slug(name).map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        let existing = self.store.find_slugs_with_prefix(&base, exclude_id).await?;
        Ok(unique_slug(&base, &existing))
    }

    async fn invalidate(&self, id: &str) -> Result<()> {
        self.cache
            .invalidate(&[self.keys.product(id), self.keys.products()])
            .await
    }
}
