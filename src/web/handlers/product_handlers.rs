// src/web/handlers/product_handlers.rs

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db::{self, products::NewProduct, products::PageParams, products::Pagination};
use crate::errors::AppError;
use crate::services::image_store;
use crate::state::AppState;

// --- Multipart form ---
//
// Every field is optional at the form level; requiredness is enforced by the
// validation below so that create and partial update share one shape and
// missing fields surface as field-level messages instead of an opaque 400.
#[derive(Debug, MultipartForm)]
pub struct ProductForm {
  pub name: Option<Text<String>>,
  pub price: Option<Text<String>>,
  pub description: Option<Text<String>>,
  pub stock: Option<Text<String>>,
  #[multipart(rename = "categoryId")]
  pub category_id: Option<Text<String>>,
  #[multipart(rename = "imageFile")]
  pub image_file: Option<TempFile>,
}

// --- Field validation ---

#[derive(Debug, Default)]
struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
  fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push((field, message.into()));
  }

  fn into_result(self) -> Result<(), AppError> {
    if self.0.is_empty() {
      return Ok(());
    }
    let detail = self
      .0
      .iter()
      .map(|(field, message)| format!("{}: {}", field, message))
      .collect::<Vec<_>>()
      .join("; ");
    Err(AppError::Validation(detail))
  }
}

fn parse_int(field: &'static str, raw: &str, errors: &mut FieldErrors) -> Option<i32> {
  match raw.trim().parse::<i32>() {
    Ok(value) => Some(value),
    Err(_) => {
      errors.push(field, "must be an integer");
      None
    }
  }
}

#[derive(Debug)]
struct ProductFields {
  name: String,
  description: String,
  price: i32,
  stock: i32,
  category_id: Option<i32>,
}

impl ProductFields {
  fn validate(&self, errors: &mut FieldErrors) {
    if self.name.trim().is_empty() {
      errors.push("name", "Product name required");
    }
    if self.description.trim().is_empty() {
      errors.push("description", "Description product required");
    }
    if self.price < 1 {
      errors.push("price", "Price must be at least 1");
    }
    if self.stock < 0 {
      errors.push("stock", "Stock cannot be negative");
    }
  }
}

fn text_value(text: Option<Text<String>>) -> Option<String> {
  text.map(|t| t.0).filter(|s| !s.trim().is_empty())
}

// --- Handlers ---

#[instrument(name = "handler::create_product", skip(app_state, form))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  MultipartForm(form): MultipartForm<ProductForm>,
) -> Result<HttpResponse, AppError> {
  let mut errors = FieldErrors::default();

  // Absent numeric fields validate like zeroes, so a missing price still
  // fails the >= 1 rule with its own message.
  let fields = ProductFields {
    name: text_value(form.name).unwrap_or_default(),
    description: text_value(form.description).unwrap_or_default(),
    price: text_value(form.price)
      .and_then(|raw| parse_int("price", &raw, &mut errors))
      .unwrap_or(0),
    stock: text_value(form.stock)
      .and_then(|raw| parse_int("stock", &raw, &mut errors))
      .unwrap_or(0),
    category_id: text_value(form.category_id).and_then(|raw| parse_int("categoryId", &raw, &mut errors)),
  };
  fields.validate(&mut errors);
  errors.into_result()?;

  let image = form
    .image_file
    .filter(|f| f.size > 0)
    .ok_or_else(|| AppError::Validation("imageFile: Product image is required".to_string()))?;

  // Upload first; the catalog row is only written once a public URL exists,
  // so a failed upload leaves no partial state behind.
  let object_path = image_store::object_path(image.file_name.as_deref().unwrap_or("upload"), Utc::now());
  let content_type = image
    .content_type
    .as_ref()
    .map(|m| m.to_string())
    .unwrap_or_else(|| "application/octet-stream".to_string());
  let bytes = tokio::fs::read(image.file.path())
    .await
    .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

  let image_url = app_state.image_store.upload(&object_path, bytes, &content_type).await?;

  let product = db::products::insert(
    &app_state.db_pool,
    NewProduct {
      name: fields.name.trim(),
      description: fields.description.trim(),
      price: fields.price,
      stock: fields.stock,
      image_url: &image_url,
      category_id: fields.category_id,
    },
  )
  .await?;

  info!(product_id = product.id, "Product created.");

  Ok(HttpResponse::Created().json(json!({
      "data": product,
      "message": "Product created successfully"
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, form), fields(product_id = %path))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  MultipartForm(form): MultipartForm<ProductForm>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let existing = db::products::find_by_id(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

  // Partial update: fields omitted from the form retain their prior values.
  let mut errors = FieldErrors::default();
  let fields = ProductFields {
    name: text_value(form.name).unwrap_or_else(|| existing.name.clone()),
    description: text_value(form.description).unwrap_or_else(|| existing.description.clone()),
    price: text_value(form.price)
      .and_then(|raw| parse_int("price", &raw, &mut errors))
      .unwrap_or(existing.price),
    stock: text_value(form.stock)
      .and_then(|raw| parse_int("stock", &raw, &mut errors))
      .unwrap_or(existing.stock),
    category_id: text_value(form.category_id)
      .and_then(|raw| parse_int("categoryId", &raw, &mut errors))
      .or(existing.category_id),
  };
  fields.validate(&mut errors);
  errors.into_result()?;

  // Optional image replace: upload the new asset (failure aborts the whole
  // update), then best-effort delete the old one.
  let mut image_url = existing.image_url.clone();
  if let Some(image) = form.image_file.filter(|f| f.size > 0) {
    let object_path = image_store::object_path(image.file_name.as_deref().unwrap_or("upload"), Utc::now());
    let content_type = image
      .content_type
      .as_ref()
      .map(|m| m.to_string())
      .unwrap_or_else(|| "application/octet-stream".to_string());
    let bytes = tokio::fs::read(image.file.path())
      .await
      .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    image_url = app_state.image_store.upload(&object_path, bytes, &content_type).await?;

    if let Err(e) = app_state.image_store.delete(&existing.image_url).await {
      warn!(product_id, error = %e, "Failed to delete replaced product image.");
    }
  }

  db::products::update(
    &app_state.db_pool,
    product_id,
    NewProduct {
      name: fields.name.trim(),
      description: fields.description.trim(),
      price: fields.price,
      stock: fields.stock,
      image_url: &image_url,
      category_id: fields.category_id,
    },
  )
  .await?;

  let product = db::products::find_view_by_id(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::Internal("Product disappeared during update.".to_string()))?;

  info!(product_id, "Product updated.");

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "product": product,
      "message": "Product updated successfully"
  })))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let existing = db::products::find_by_id(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

  db::products::delete(&app_state.db_pool, product_id).await?;

  // Mirror the update path: the stored asset is cleaned up best-effort and
  // never fails the delete.
  if let Err(e) = app_state.image_store.delete(&existing.image_url).await {
    warn!(product_id, error = %e, "Failed to delete product image asset.");
  }

  info!(product_id, "Product deleted.");

  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
  pub search: Option<String>,
  #[serde(rename = "categoryId")]
  pub category_id: Option<i32>,
}

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = PageParams::new(query.page, query.limit);
  let search = query.search.as_deref().unwrap_or("");

  let (products, total) = db::products::list(&app_state.db_pool, params, search, query.category_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "product": products,
      "pagination": Pagination::new(params, total)
  })))
}
