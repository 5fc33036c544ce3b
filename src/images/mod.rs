//! Image host seam.
//!
//! Category images arrive as data URIs and are pushed to a hosted image
//! service, which hands back a durable URL and an opaque public id.

mod cloudinary;

use async_trait::async_trait;
use base64::Engine;
use thiserror::Error;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};

/// Folder hint used for category images.
pub const CATEGORY_FOLDER: &str = "categories";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid image data URI: {0}")]
    InvalidDataUri(String),
    #[error("Image upload failed: {0}")]
    Upload(String),
    #[error("Image host is not configured")]
    NotConfigured,
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// What the image host returns for a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads a `data:` URI into `folder` and returns where it landed.
    async fn upload(&self, data_uri: &str, folder: &str) -> Result<UploadedImage>;

    /// Removes a previously uploaded image.
    async fn destroy(&self, public_id: &str) -> Result<()>;
}

/// Image host used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredImageHost;

#[async_trait]
impl ImageHost for UnconfiguredImageHost {
    async fn upload(&self, _data_uri: &str, _folder: &str) -> Result<UploadedImage> {
        Err(ImageError::NotConfigured)
    }

    async fn destroy(&self, _public_id: &str) -> Result<()> {
        Err(ImageError::NotConfigured)
    }
}

/// A decoded `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parses and checks an image data URI before it is sent anywhere.
pub fn parse_data_uri(uri: &str) -> Result<DataUri> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidDataUri("missing `data:` scheme".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidDataUri("missing payload".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidDataUri("payload must be base64".to_string()))?;

    if !mime.starts_with("image/") {
        return Err(ImageError::InvalidDataUri(format!(
            "unsupported media type `{}`",
            mime
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidDataUri(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageError::InvalidDataUri("empty image".to_string()));
    }

    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}
