//! Backing store seam.
//!
//! The relational store is authoritative for every entity. The traits here
//! give it a conventional find-many / find-unique / create / update / delete
//! shape keyed by entity id, so the repositories never depend on a concrete
//! database.

mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Attribute, AttributeFields, Category, CategoryChanges, NewCategory, NewProduct, Product,
    ProductChanges,
};

pub use memory::InMemoryStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, oldest first.
    async fn find_products(&self) -> Result<Vec<Product>>;

    async fn find_product(&self, id: &str) -> Result<Option<Product>>;

    /// Slugs starting with `prefix`, optionally ignoring one product.
    async fn find_slugs_with_prefix(
        &self,
        prefix: &str,
        exclude_id: Option<&str>,
    ) -> Result<HashSet<String>>;

    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Product>;

    /// Deletes and returns the removed product.
    async fn delete_product(&self, id: &str) -> Result<Product>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, oldest first.
    async fn find_categories(&self) -> Result<Vec<Category>>;

    async fn find_category(&self, id: &str) -> Result<Option<Category>>;

    async fn create_category(&self, category: NewCategory) -> Result<Category>;

    async fn update_category(&self, id: &str, changes: CategoryChanges) -> Result<Category>;

    /// Deletes and returns the removed category.
    async fn delete_category(&self, id: &str) -> Result<Category>;
}

#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// All attributes by ascending display order.
    async fn find_attributes(&self) -> Result<Vec<Attribute>>;

    async fn create_attribute(&self, fields: AttributeFields) -> Result<Attribute>;

    async fn update_attribute(&self, id: &str, fields: AttributeFields) -> Result<Attribute>;

    async fn delete_attribute(&self, id: &str) -> Result<Attribute>;
}
