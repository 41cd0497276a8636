// src/db/products.rs

use crate::errors::Result;
use crate::models::{Category, Product, ProductView};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Listing parameters after defaulting and clamping. The storefront grid
/// shows nine products per page.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
  pub page: i64,
  pub limit: i64,
}

impl PageParams {
  pub const DEFAULT_LIMIT: i64 = 9;

  /// Both values are floored at 1; a zero or negative page would otherwise
  /// turn into a negative OFFSET.
  pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
    Self {
      page: page.unwrap_or(1).max(1),
      limit: limit.unwrap_or(Self::DEFAULT_LIMIT).max(1),
    }
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1) * self.limit
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page: i64,
  pub limit: i64,
  pub total: i64,
  pub total_pages: i64,
}

impl Pagination {
  pub fn new(params: PageParams, total: i64) -> Self {
    Self {
      page: params.page,
      limit: params.limit,
      total,
      total_pages: (total + params.limit - 1) / params.limit,
    }
  }
}

/// Escapes LIKE metacharacters so a search term is matched literally, then
/// wraps it for substring matching.
fn like_pattern(search: &str) -> String {
  let escaped = search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
  format!("%{}%", escaped)
}

// Flat row shape for the LEFT JOIN against categories.
#[derive(FromRow)]
struct ProductCategoryRow {
  id: i32,
  name: String,
  description: String,
  price: i32,
  stock: i32,
  image_url: String,
  category_id: Option<i32>,
  created_at: DateTime<Utc>,
  cat_id: Option<i32>,
  cat_name: Option<String>,
}

impl From<ProductCategoryRow> for ProductView {
  fn from(row: ProductCategoryRow) -> Self {
    let category = match (row.cat_id, row.cat_name) {
      (Some(id), Some(name)) => Some(Category { id, name }),
      _ => None,
    };
    ProductView {
      product: Product {
        id: row.id,
        name: row.name,
        description: row.description,
        price: row.price,
        stock: row.stock,
        image_url: row.image_url,
        category_id: row.category_id,
        created_at: row.created_at,
      },
      category,
    }
  }
}

const SELECT_VIEW: &str = "SELECT p.id, p.name, p.description, p.price, p.stock, p.image_url, \
                           p.category_id, p.created_at, c.id AS cat_id, c.name AS cat_name \
                           FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// Filtered, paginated listing: newest first, name substring match
/// (case-insensitive), optional category restriction. Returns the page slice
/// and the total row count for the same filter.
pub async fn list(
  pool: &PgPool,
  params: PageParams,
  search: &str,
  category_id: Option<i32>,
) -> Result<(Vec<ProductView>, i64)> {
  let pattern = like_pattern(search);

  let rows = sqlx::query_as::<_, ProductCategoryRow>(&format!(
    "{SELECT_VIEW} WHERE p.name ILIKE $1 AND ($2::INT IS NULL OR p.category_id = $2) \
     ORDER BY p.created_at DESC, p.id DESC LIMIT $3 OFFSET $4"
  ))
  .bind(&pattern)
  .bind(category_id)
  .bind(params.limit)
  .bind(params.offset())
  .fetch_all(pool)
  .await?;

  let total: i64 = sqlx::query_scalar(
    "SELECT COUNT(*) FROM products p WHERE p.name ILIKE $1 AND ($2::INT IS NULL OR p.category_id = $2)",
  )
  .bind(&pattern)
  .bind(category_id)
  .fetch_one(pool)
  .await?;

  Ok((rows.into_iter().map(ProductView::from).collect(), total))
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
  let product = sqlx::query_as::<_, Product>(
    "SELECT id, name, description, price, stock, image_url, category_id, created_at FROM products WHERE id = $1",
  )
  .bind(id)
  .fetch_optional(pool)
  .await?;
  Ok(product)
}

pub async fn find_view_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductView>> {
  let row = sqlx::query_as::<_, ProductCategoryRow>(&format!("{SELECT_VIEW} WHERE p.id = $1"))
    .bind(id)
    .fetch_optional(pool)
    .await?;
  Ok(row.map(ProductView::from))
}

pub struct NewProduct<'a> {
  pub name: &'a str,
  pub description: &'a str,
  pub price: i32,
  pub stock: i32,
  pub image_url: &'a str,
  pub category_id: Option<i32>,
}

pub async fn insert(pool: &PgPool, new: NewProduct<'_>) -> Result<Product> {
  let product = sqlx::query_as::<_, Product>(
    "INSERT INTO products (name, description, price, stock, image_url, category_id) \
     VALUES ($1, $2, $3, $4, $5, $6) \
     RETURNING id, name, description, price, stock, image_url, category_id, created_at",
  )
  .bind(new.name)
  .bind(new.description)
  .bind(new.price)
  .bind(new.stock)
  .bind(new.image_url)
  .bind(new.category_id)
  .fetch_one(pool)
  .await?;
  Ok(product)
}

/// Writes the already-merged field set; partial-update merging happens at the
/// handler against the existing row.
pub async fn update(pool: &PgPool, id: i32, merged: NewProduct<'_>) -> Result<Product> {
  let product = sqlx::query_as::<_, Product>(
    "UPDATE products SET name = $2, description = $3, price = $4, stock = $5, image_url = $6, category_id = $7 \
     WHERE id = $1 \
     RETURNING id, name, description, price, stock, image_url, category_id, created_at",
  )
  .bind(id)
  .bind(merged.name)
  .bind(merged.description)
  .bind(merged.price)
  .bind(merged.stock)
  .bind(merged.image_url)
  .bind(merged.category_id)
  .fetch_one(pool)
  .await?;
  Ok(product)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
  let result = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}
