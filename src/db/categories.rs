// src/db/categories.rs

use crate::errors::{AppError, Result};
use crate::models::Category;
use sqlx::PgPool;

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
  let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
    .bind(id)
    .fetch_optional(pool)
    .await?;
  Ok(category)
}

/// Case-insensitive name lookup. `exclude_id` lets a rename check against
/// every category except the one being renamed.
pub async fn find_by_name_ci(pool: &PgPool, name: &str, exclude_id: Option<i32>) -> Result<Option<Category>> {
  let category = sqlx::query_as::<_, Category>(
    "SELECT id, name FROM categories WHERE LOWER(name) = LOWER($1) AND ($2::INT IS NULL OR id <> $2)",
  )
  .bind(name)
  .bind(exclude_id)
  .fetch_optional(pool)
  .await?;
  Ok(category)
}

pub async fn insert(pool: &PgPool, name: &str) -> Result<Category> {
  sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_db_unique(e, "Category is already exist."))
}

pub async fn rename(pool: &PgPool, id: i32, name: &str) -> Result<Category> {
  sqlx::query_as::<_, Category>("UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name")
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_db_unique(e, "Category name is already in use."))
}

/// Deletes the row. Dependent products keep existing with their
/// `category_id` nulled out by the schema's `ON DELETE SET NULL`.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool> {
  let result = sqlx::query("DELETE FROM categories WHERE id = $1")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Category>> {
  let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
    .fetch_all(pool)
    .await?;
  Ok(categories)
}
