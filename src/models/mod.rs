//! Entities and request/response models for the catalog API
//!
//! Entities are what the backing store owns and the cache copies; the DTOs
//! are what crosses the HTTP boundary.

pub mod entities;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entities::{
    Attribute, AttributeFields, AttributeValue, Category, CategoryChanges, NewCategory,
    NewProduct, Product, ProductChanges,
};
pub use requests::{
    AttributeRequest, CreateCategoryRequest, CreateProductRequest, UpdateCategoryRequest,
    UpdateProductRequest, Validate,
};
pub use responses::{ApiResponse, HealthResponse, Source, StatsResponse};
