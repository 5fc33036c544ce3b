//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint. Products and categories
//! are served through their cache-aside repositories; attributes go straight
//! to the store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::extract::ValidJson;
use crate::cache::{Cache, CacheKeys, CacheStats, MemoryCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::images::ImageHost;
use crate::models::{
    ApiResponse, Attribute, AttributeFields, AttributeRequest, Category, CreateCategoryRequest,
    CreateProductRequest, HealthResponse, Product, StatsResponse, UpdateCategoryRequest,
    UpdateProductRequest,
};
use crate::repository::{CacheAside, CategoryRepository, Fetched, ProductRepository};
use crate::store::{AttributeStore, CategoryStore, ProductStore};

/// Application state shared across all handlers.
///
/// Every client is constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub attributes: Arc<dyn AttributeStore>,
    pub stats: Arc<CacheStats>,
    /// Set when the in-process cache backs the repositories
    pub memory_cache: Option<MemoryCache>,
}

impl AppState {
    /// Wires the repositories over one cache, one store and one image host.
    pub fn new<S>(
        config: &Config,
        cache: Arc<dyn Cache>,
        store: Arc<S>,
        images: Arc<dyn ImageHost>,
    ) -> Self
    where
        S: ProductStore + CategoryStore + AttributeStore + 'static,
    {
        let stats = Arc::new(CacheStats::new());
        let cache = CacheAside::new(cache)
            .with_ttl(config.cache_ttl())
            .with_policy(config.cache_failure_policy)
            .with_stats(stats.clone());
        let keys = CacheKeys::new(config.cache_key_prefix.clone());

        Self {
            products: ProductRepository::new(store.clone(), cache.clone(), keys.clone()),
            categories: CategoryRepository::new(store.clone(), images, cache, keys),
            attributes: store,
            stats,
            memory_cache: None,
        }
    }

    /// Exposes the memory cache's size on the stats endpoint.
    pub fn with_memory_cache(mut self, cache: MemoryCache) -> Self {
        self.memory_cache = Some(cache);
        self
    }
}

fn read_response<T>(fetched: Fetched<T>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(fetched.value).with_source(fetched.source))
}

fn write_response<T>(value: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(value).with_message(message))
}

// == Products ==

/// Handler for GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    Ok(read_response(state.products.list().await?))
}

/// Handler for GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    Ok(read_response(state.products.get(&id).await?))
}

/// Handler for POST /api/products/create
pub async fn create_product(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state.products.create(&req).await?;
    Ok(write_response(product, "Product successfully created"))
}

/// Handler for PATCH /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state.products.update(&id, &req).await?;
    Ok(write_response(product, "Product successfully updated"))
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state.products.delete(&id).await?;
    Ok(write_response(product, "Product successfully deleted"))
}

// == Categories ==

/// Handler for GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    Ok(read_response(state.categories.list().await?))
}

/// Handler for GET /api/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>> {
    Ok(read_response(state.categories.get(&id).await?))
}

/// Handler for POST /api/categories/create
pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = state.categories.create(&req).await?;
    Ok(write_response(category, "Category successfully created"))
}

/// Handler for PATCH /api/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = state.categories.update(&id, &req).await?;
    Ok(write_response(category, "Category successfully updated"))
}

/// Handler for DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = state.categories.delete(&id).await?;
    Ok(write_response(category, "Category successfully deleted"))
}

// == Attributes ==

fn attribute_fields(req: AttributeRequest) -> Result<AttributeFields> {
    let display_order = u32::try_from(req.display_order)
        .map_err(|_| AppError::InvalidRequest("Display order out of range".to_string()))?;

    let values = req
        .values
        .into_iter()
        .map(|mut v| {
            if v.id.trim().is_empty() {
                v.id = Uuid::new_v4().to_string();
            }
            v.value = v.value.trim().to_string();
            v
        })
        .collect();

    Ok(AttributeFields {
        name: req.name.trim().to_string(),
        description: req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        is_required: req.is_required,
        display_order,
        values,
    })
}

/// Handler for GET /api/attributes
pub async fn list_attributes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Attribute>>>> {
    let attributes = state.attributes.find_attributes().await?;
    Ok(Json(ApiResponse::ok(attributes)))
}

/// Handler for POST /api/attributes
pub async fn create_attribute(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<AttributeRequest>,
) -> Result<Json<ApiResponse<Attribute>>> {
    let attribute = state.attributes.create_attribute(attribute_fields(req)?).await?;
    tracing::info!(attribute_id = %attribute.id, "Attribute created");
    Ok(write_response(attribute, "Attribute successfully created"))
}

/// Handler for PUT /api/attributes/:id
pub async fn update_attribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<AttributeRequest>,
) -> Result<Json<ApiResponse<Attribute>>> {
    let attribute = state
        .attributes
        .update_attribute(&id, attribute_fields(req)?)
        .await?;
    Ok(write_response(attribute, "Attribute successfully updated"))
}

/// Handler for DELETE /api/attributes/:id
pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Attribute>>> {
    let attribute = state.attributes.delete_attribute(&id).await?;
    Ok(write_response(attribute, "Attribute successfully deleted"))
}

// == Service ==

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.stats.snapshot();
    match &state.memory_cache {
        Some(cache) => Json(StatsResponse::with_evictions(
            snapshot,
            Some(cache.len().await),
            Some(cache.evictions().await),
        )),
        None => Json(StatsResponse::new(snapshot, None)),
    }
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
