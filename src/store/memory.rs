//! In-memory store backend.
//!
//! Stands in for the relational database: one lock over all tables so the
//! cross-table checks (foreign keys, unique slugs) are atomic with the write.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Attribute, AttributeFields, Category, CategoryChanges, NewCategory, NewProduct, Product,
    ProductChanges,
};
use crate::store::{AttributeStore, CategoryStore, ProductStore, Result, StoreError};

#[derive(Debug, Default)]
struct Tables {
    // Insertion order doubles as creation order
    products: Vec<Product>,
    categories: Vec<Category>,
    attributes: Vec<Attribute>,
}

impl Tables {
    fn product_index(&self, id: &str) -> Result<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found("Product", id))
    }

    fn category_index(&self, id: &str) -> Result<usize> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found("Category", id))
    }

    fn attribute_index(&self, id: &str) -> Result<usize> {
        self.attributes
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| not_found("Attribute", id))
    }

    fn ensure_category(&self, id: &str) -> Result<()> {
        if self.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(format!(
                "category `{}` does not exist",
                id
            )))
        }
    }

    fn ensure_slug_free(&self, slug: &str, owner: Option<&str>) -> Result<()> {
        let taken = self
            .products
            .iter()
            .any(|p| p.slug == slug && Some(p.id.as_str()) != owner);
        if taken {
            Err(StoreError::Conflict(format!(
                "slug `{}` already exists",
                slug
            )))
        } else {
            Ok(())
        }
    }
}

fn not_found(entity: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory storage backend.
///
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn find_products(&self) -> Result<Vec<Product>> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_slugs_with_prefix(
        &self,
        prefix: &str,
        exclude_id: Option<&str>,
    ) -> Result<HashSet<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| Some(p.id.as_str()) != exclude_id)
            .filter(|p| p.slug.starts_with(prefix))
            .map(|p| p.slug.clone())
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        tables.ensure_category(&product.category_id)?;
        tables.ensure_slug_free(&product.slug, None)?;

        let now = Utc::now();
        let created = Product {
            id: new_id(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            category_id: product.category_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let index = tables.product_index(id)?;
        if let Some(category_id) = &changes.category_id {
            tables.ensure_category(category_id)?;
        }
        if let Some(slug) = &changes.slug {
            tables.ensure_slug_free(slug, Some(id))?;
        }

        let product = &mut tables.products[index];
        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(slug) = changes.slug {
            product.slug = slug;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let index = tables.product_index(id)?;
        Ok(tables.products.remove(index))
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn find_categories(&self) -> Result<Vec<Category>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn find_category(&self, id: &str) -> Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let now = Utc::now();
        let created = Category {
            id: new_id(),
            name: category.name,
            description: category.description,
            is_active: category.is_active,
            image_url: category.image_url,
            image_public_id: category.image_public_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.categories.push(created.clone());
        Ok(created)
    }

    async fn update_category(&self, id: &str, changes: CategoryChanges) -> Result<Category> {
        let mut tables = self.tables.write().await;
        let index = tables.category_index(id)?;

        let category = &mut tables.categories[index];
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        if let Some(is_active) = changes.is_active {
            category.is_active = is_active;
        }
        if let Some(image_url) = changes.image_url {
            category.image_url = image_url;
        }
        if let Some(public_id) = changes.image_public_id {
            category.image_public_id = public_id;
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<Category> {
        let mut tables = self.tables.write().await;
        let index = tables.category_index(id)?;

        let in_use = tables.products.iter().filter(|p| p.category_id == id).count();
        if in_use > 0 {
            return Err(StoreError::Conflict(format!(
                "category `{}` is still used by {} product(s)",
                id, in_use
            )));
        }

        Ok(tables.categories.remove(index))
    }
}

#[async_trait]
impl AttributeStore for InMemoryStore {
    async fn find_attributes(&self) -> Result<Vec<Attribute>> {
        let mut attributes = self.tables.read().await.attributes.clone();
        // Stable sort keeps creation order within one display slot
        attributes.sort_by_key(|a| a.display_order);
        Ok(attributes)
    }

    async fn create_attribute(&self, fields: AttributeFields) -> Result<Attribute> {
        let now = Utc::now();
        let created = Attribute {
            id: new_id(),
            name: fields.name,
            description: fields.description,
            is_required: fields.is_required,
            display_order: fields.display_order,
            values: fields.values,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.attributes.push(created.clone());
        Ok(created)
    }

    async fn update_attribute(&self, id: &str, fields: AttributeFields) -> Result<Attribute> {
        let mut tables = self.tables.write().await;
        let index = tables.attribute_index(id)?;

        let attribute = &mut tables.attributes[index];
        attribute.name = fields.name;
        attribute.description = fields.description;
        attribute.is_required = fields.is_required;
        attribute.display_order = fields.display_order;
        attribute.values = fields.values;
        attribute.updated_at = Utc::now();
        Ok(attribute.clone())
    }

    async fn delete_attribute(&self, id: &str) -> Result<Attribute> {
        let mut tables = self.tables.write().await;
        let index = tables.attribute_index(id)?;
        Ok(tables.attributes.remove(index))
    }
}
