// src/main.rs

use flourish::config::AppConfig;
use flourish::services::image_store::{HttpImageStore, ImageStore};
use flourish::services::image_store_mock::MockImageStore;
use flourish::state::AppState;
use flourish::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront data service...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  // Apply pending migrations so the uniqueness constraints the handlers rely
  // on are guaranteed to exist.
  if app_config.run_migrations {
    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
      tracing::error!(error = %e, "Failed to run database migrations.");
      panic!("Migration error: {}", e);
    }
    tracing::info!("Database migrations are up to date.");
  }

  // Select the image store: the HTTP-backed object store when configured,
  // the in-memory mock otherwise.
  let image_store: Arc<dyn ImageStore> = match &app_config.storage {
    Some(storage_config) => {
      tracing::info!(bucket = %storage_config.bucket, "Using HTTP image store.");
      Arc::new(HttpImageStore::new(storage_config))
    }
    None => {
      tracing::warn!("STORAGE_URL not set; falling back to the in-memory image store.");
      Arc::new(MockImageStore::new())
    }
  };

  // Create AppState
  let app_state = AppState {
    db_pool: db_pool.clone(),
    config: app_config.clone(),
    image_store,
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
