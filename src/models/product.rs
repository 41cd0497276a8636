// src/models/product.rs

use crate::models::category::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub description: String,
  /// Currency minor units are not tracked; prices are whole integer amounts.
  pub price: i32,
  pub stock: i32,
  pub image_url: String,
  pub category_id: Option<i32>,
  pub created_at: DateTime<Utc>,
}

/// A product joined with its (optional) category, as returned by the listing
/// and update endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
  #[serde(flatten)]
  pub product: Product,
  pub category: Option<Category>,
}
