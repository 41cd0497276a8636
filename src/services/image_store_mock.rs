// src/services/image_store_mock.rs

//! In-memory stand-in for the object store, used in local development (no
//! STORAGE_URL configured) and in tests.

use crate::errors::{AppError, Result};
use crate::services::image_store::ImageStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::info;

const MOCK_BASE_URL: &str = "mock://flourish";

#[derive(Default)]
pub struct MockImageStore {
  objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockImageStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, object_path: &str) -> bool {
    self.objects.lock().contains_key(object_path)
  }

  pub fn len(&self) -> usize {
    self.objects.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.lock().is_empty()
  }
}

#[async_trait]
impl ImageStore for MockImageStore {
  async fn upload(&self, object_path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String> {
    info!(object_path, size = bytes.len(), "Mock image store upload.");
    self.objects.lock().insert(object_path.to_string(), bytes);
    Ok(format!("{}/{}", MOCK_BASE_URL, object_path))
  }

  async fn delete(&self, public_url: &str) -> Result<()> {
    let object_path = public_url
      .strip_prefix(&format!("{}/", MOCK_BASE_URL))
      .ok_or_else(|| AppError::Asset(format!("Unknown mock object URL '{}'", public_url)))?;
    match self.objects.lock().remove(object_path) {
      Some(_) => Ok(()),
      None => Err(AppError::Asset(format!("Mock object '{}' does not exist", object_path))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn upload_then_delete_roundtrip() {
    let store = MockImageStore::new();
    let url = store
      .upload("productImage/1.png", vec![1, 2, 3], "image/png")
      .await
      .unwrap();
    assert_eq!(url, "mock://flourish/productImage/1.png");
    assert!(store.contains("productImage/1.png"));

    store.delete(&url).await.unwrap();
    assert!(store.is_empty());
  }

  #[tokio::test]
  async fn deleting_a_missing_object_fails() {
    let store = MockImageStore::new();
    let err = store.delete("mock://flourish/productImage/nope.png").await.unwrap_err();
    assert!(matches!(err, AppError::Asset(_)));
  }
}
