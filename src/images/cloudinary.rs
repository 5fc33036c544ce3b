//! Cloudinary image host client.
//!
//! Signed uploads over the REST API. Each call is a single request with no
//! retry; the caller blocks on it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::images::{parse_data_uri, ImageError, ImageHost, Result, UploadedImage};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Account credentials and upload placement.
///
/// Signatures are SHA-256, so the account must have SHA-256 signing enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Every folder hint is nested under this root
    pub folder_root: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        folder_root: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder_root: folder_root.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryHost {
    config: CloudinaryConfig,
    http: reqwest::Client,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource,
            action
        )
    }

    /// Adds `timestamp`, `api_key` and `signature` to the signed parameters.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.config.api_secret);

        let mut form: Vec<(&'static str, String)> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        form: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ImageError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Upload(format!("{}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ImageError::Upload(e.to_string()))
    }
}

/// Hex SHA-256 over `k=v&k=v` (keys sorted) followed by the secret.
fn sign(params: &BTreeMap<&'static str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, data_uri: &str, folder: &str) -> Result<UploadedImage> {
        parse_data_uri(data_uri)?;

        let folder = format!("{}/{}", self.config.folder_root, folder);
        let mut params = BTreeMap::new();
        params.insert("folder", folder.clone());
        let mut form = self.signed_form(params);
        // `file` is the payload itself and is never part of the signature
        form.push(("file", data_uri.to_string()));

        let uploaded: UploadResponse = self.post(self.endpoint("image", "upload"), form).await?;
        tracing::info!(public_id = %uploaded.public_id, folder = %folder, "Image uploaded");

        Ok(UploadedImage {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let form = self.signed_form(params);

        let destroyed: DestroyResponse = self.post(self.endpoint("image", "destroy"), form).await?;
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(ImageError::Upload(format!("destroy returned `{}`", other))),
        }
    }
}
