// src/state.rs
use crate::config::AppConfig;
use crate::services::image_store::ImageStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>, // Share loaded config
  pub image_store: Arc<dyn ImageStore>,
}
