use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use super::sigv4::{self, Credentials};
use crate::config::StorageSettings;

pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Persists uploaded images and hands back a URL the model can fetch.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String>;
}

/// S3-compatible store using path-style addressing (`endpoint/bucket/key`).
pub struct S3ImageStore {
    settings: StorageSettings,
    client: reqwest::Client,
}

impl S3ImageStore {
    pub fn new(settings: StorageSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build storage HTTP client")?;

        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String> {
        let key = new_object_key();
        let object_url = object_url(&self.settings.endpoint, &self.settings.bucket, &key);
        let url = reqwest::Url::parse(&object_url)
            .with_context(|| format!("Invalid object URL: {}", object_url))?;

        let creds = Credentials {
            access_key_id: &self.settings.access_key_id,
            secret_access_key: &self.settings.secret_access_key,
            region: &self.settings.region,
        };
        let signed = sigv4::sign(&creds, "PUT", &url, IMAGE_CONTENT_TYPE, &bytes, Utc::now())?;

        log::debug!("🪣 PUT {} ({} bytes)", object_url, bytes.len());

        let response = self
            .client
            .put(url)
            .header("Content-Type", IMAGE_CONTENT_TYPE)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header("Authorization", signed.authorization)
            .body(bytes)
            .send()
            .await
            .context("Object storage request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Object storage error ({}): {}", status, error_text);
        }

        log::info!("✅ Image stored: {}", object_url);
        Ok(object_url)
    }
}

/// Fresh key per call, so identical bytes still land in distinct objects.
pub fn new_object_key() -> String {
    format!("{}.jpg", Uuid::new_v4())
}

pub fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}
