//! Request DTOs for the catalog API
//!
//! Defines incoming HTTP request bodies and their validation rules. Validation
//! runs before any cache or store interaction.

use serde::Deserialize;

use crate::models::AttributeValue;

/// Highest `displayOrder` an attribute may use.
pub const MAX_DISPLAY_ORDER: i64 = 50;

/// Request payload validation.
pub trait Validate {
    /// Returns an error message if validation fails, None if valid.
    fn validate(&self) -> Option<String>;
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Treats blank optional strings as absent, so `""` never overwrites a field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !is_blank(v))
}

// == Products ==

/// Request body for `POST /api/products/create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: String,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Option<String> {
        if is_blank(&self.name) || is_blank(&self.description) || is_blank(&self.category_id) {
            return Some("Missing required fields".to_string());
        }
        None
    }
}

/// Request body for `PATCH /api/products/:id`
///
/// Only the fields provided (and non-blank) are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
}

impl UpdateProductRequest {
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    pub fn category_id(&self) -> Option<&str> {
        present(&self.category_id)
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Option<String> {
        None
    }
}

// == Categories ==

/// Request body for `POST /api/categories/create`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Image encoded as `data:image/...;base64,...`
    #[serde(default, alias = "imageDataURI")]
    pub image_data_uri: String,
}

fn default_active() -> bool {
    true
}

fn validate_category_name(name: &str) -> Option<String> {
    if name.trim().chars().count() < 2 {
        return Some("Name must be at least 2 characters.".to_string());
    }
    None
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Option<String> {
        if let Some(err) = validate_category_name(&self.name) {
            return Some(err);
        }
        if is_blank(&self.image_data_uri) {
            return Some("Image is required".to_string());
        }
        None
    }
}

/// Request body for `PATCH /api/categories/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(alias = "imageDataURI")]
    pub image_data_uri: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    pub fn image_data_uri(&self) -> Option<&str> {
        present(&self.image_data_uri)
    }
}

impl Validate for UpdateCategoryRequest {
    fn validate(&self) -> Option<String> {
        self.name().and_then(validate_category_name)
    }
}

// == Attributes ==

/// Request body for `POST /api/attributes` and `PUT /api/attributes/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

impl Validate for AttributeRequest {
    fn validate(&self) -> Option<String> {
        if is_blank(&self.name) {
            return Some("Name is required".to_string());
        }
        if !(0..=MAX_DISPLAY_ORDER).contains(&self.display_order) {
            return Some(format!(
                "Display order must be between 0 and {}",
                MAX_DISPLAY_ORDER
            ));
        }
        if self.values.is_empty() {
            return Some("At least one attribute value is required".to_string());
        }
        if self.values.iter().any(|v| is_blank(&v.value)) {
            return Some("Value is required".to_string());
        }
        None
    }
}
