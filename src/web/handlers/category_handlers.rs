// src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::db;
use crate::errors::AppError;
use crate::state::AppState;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct CategoryPayload {
  pub name: String,
}

fn validate_name(name: &str) -> Result<(), AppError> {
  if name.trim().is_empty() {
    return Err(AppError::Validation("Category name is required.".to_string()));
  }
  Ok(())
}

#[instrument(name = "handler::create_category", skip(app_state, payload), fields(name = %payload.name))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CategoryPayload>,
) -> Result<HttpResponse, AppError> {
  validate_name(&payload.name)?;

  // Pre-check for a friendlier message; the unique index on LOWER(name)
  // still catches concurrent creates.
  if db::categories::find_by_name_ci(&app_state.db_pool, &payload.name, None)
    .await?
    .is_some()
  {
    return Err(AppError::Conflict("Category is already exist.".to_string()));
  }

  let category = db::categories::insert(&app_state.db_pool, payload.name.trim()).await?;
  info!(category_id = category.id, "Category created.");

  Ok(HttpResponse::Ok().json(json!({
      "category": category,
      "message": "Create category successfully"
  })))
}

#[instrument(name = "handler::update_category", skip(app_state, path, payload), fields(category_id = %path))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  payload: web::Json<CategoryPayload>,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();
  validate_name(&payload.name)?;

  if db::categories::find_by_id(&app_state.db_pool, category_id)
    .await?
    .is_none()
  {
    return Err(AppError::NotFound("Category not found.".to_string()));
  }

  // Another category (different id) holding the name case-insensitively
  // blocks the rename.
  if db::categories::find_by_name_ci(&app_state.db_pool, &payload.name, Some(category_id))
    .await?
    .is_some()
  {
    return Err(AppError::Conflict("Category name is already in use.".to_string()));
  }

  let category = db::categories::rename(&app_state.db_pool, category_id, payload.name.trim()).await?;
  info!(category_id, "Category renamed.");

  Ok(HttpResponse::Ok().json(json!({
      "category": category,
      "message": "Category updated successfully"
  })))
}

#[instrument(name = "handler::delete_category", skip(app_state, path), fields(category_id = %path))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let category_id = path.into_inner();

  let deleted = db::categories::delete(&app_state.db_pool, category_id).await?;
  if !deleted {
    return Err(AppError::NotFound("Category not found".to_string()));
  }
  info!(category_id, "Category deleted; dependent products keep a null category.");

  Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = db::categories::list(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(categories))
}
