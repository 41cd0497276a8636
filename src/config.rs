// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Connection settings for the external object storage that holds product
/// images. Absent in local development, where the in-memory store is used.
#[derive(Debug, Clone)]
pub struct StorageConfig {
  pub base_url: String,
  pub service_key: String,
  pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  /// HS256 signing secret for session tokens.
  pub jwt_secret: String,

  /// `None` selects the in-memory mock image store.
  pub storage: Option<StorageConfig>,

  // Optional: run pending migrations on startup
  pub run_migrations: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let jwt_secret = get_env("JWT_SECRET")?;

    let storage = match env::var("STORAGE_URL") {
      Ok(base_url) => Some(StorageConfig {
        base_url,
        service_key: get_env("STORAGE_SERVICE_KEY")?,
        bucket: get_env("STORAGE_BUCKET").unwrap_or_else(|_| "flourish".to_string()),
      }),
      Err(_) => None,
    };

    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      jwt_secret,
      storage,
      run_migrations,
    })
  }
}
