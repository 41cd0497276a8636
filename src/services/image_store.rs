// src/services/image_store.rs

//! The external object store holding product images.
//!
//! Products reference their image by public URL only; upload happens before
//! the catalog row is written, and deletions are best-effort cleanup decided
//! by the caller.

use crate::config::StorageConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use tracing::instrument;

/// Bucket folder that holds every product image.
pub const OBJECT_PREFIX: &str = "productImage";

#[async_trait]
pub trait ImageStore: Send + Sync {
  /// Stores the bytes under `object_path` and returns the public URL.
  async fn upload(&self, object_path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

  /// Removes the object a previously returned public URL points at.
  async fn delete(&self, public_url: &str) -> Result<()>;
}

/// Derives a collision-free object path for an uploaded file, keeping the
/// original extension.
pub fn object_path(original_file_name: &str, now: DateTime<Utc>) -> String {
  let ext = std::path::Path::new(original_file_name)
    .extension()
    .and_then(|e| e.to_str())
    .unwrap_or("bin");
  format!("{}/{}.{}", OBJECT_PREFIX, now.timestamp_millis(), ext)
}

/// Recovers the object path from a public URL (the last path segment under
/// the image prefix). Returns `None` for URLs this store never produced.
pub fn object_path_from_url(public_url: &str) -> Option<String> {
  let file_name = public_url.rsplit('/').next().filter(|s| !s.is_empty())?;
  Some(format!("{}/{}", OBJECT_PREFIX, file_name))
}

/// Supabase-style storage API client: objects are addressed as
/// `{base}/storage/v1/object/{bucket}/{path}` and served publicly from
/// `{base}/storage/v1/object/public/{bucket}/{path}`.
pub struct HttpImageStore {
  http: reqwest::Client,
  base_url: String,
  bucket: String,
  service_key: String,
}

impl HttpImageStore {
  pub fn new(config: &StorageConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: config.base_url.trim_end_matches('/').to_string(),
      bucket: config.bucket.clone(),
      service_key: config.service_key.clone(),
    }
  }

  fn object_url(&self, object_path: &str) -> String {
    format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, object_path)
  }

  fn public_url(&self, object_path: &str) -> String {
    format!(
      "{}/storage/v1/object/public/{}/{}",
      self.base_url, self.bucket, object_path
    )
  }
}

#[async_trait]
impl ImageStore for HttpImageStore {
  #[instrument(name = "image_store::upload", skip(self, bytes), fields(bucket = %self.bucket))]
  async fn upload(&self, object_path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
    let response = self
      .http
      .post(self.object_url(object_path))
      .bearer_auth(&self.service_key)
      .header(CONTENT_TYPE, content_type)
      .header("cache-control", "3600")
      .header("x-upsert", "false")
      .body(bytes)
      .send()
      .await
      .map_err(|e| AppError::Asset(format!("Image upload request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Asset(format!(
        "Image upload rejected with status {}: {}",
        status, detail
      )));
    }

    Ok(self.public_url(object_path))
  }

  #[instrument(name = "image_store::delete", skip(self), fields(bucket = %self.bucket))]
  async fn delete(&self, public_url: &str) -> Result<()> {
    let object_path = object_path_from_url(public_url)
      .ok_or_else(|| AppError::Asset(format!("Cannot derive object path from URL '{}'", public_url)))?;

    let response = self
      .http
      .delete(self.object_url(&object_path))
      .bearer_auth(&self.service_key)
      .send()
      .await
      .map_err(|e| AppError::Asset(format!("Image delete request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Asset(format!(
        "Image delete rejected with status {}: {}",
        status, detail
      )));
    }

    Ok(())
  }
}
