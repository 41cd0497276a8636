// src/db/users.rs

use crate::errors::Result;
use crate::models::User;
use sqlx::PgPool;

const SELECT_USER: &str = "SELECT id, username, email, password_hash, role, created_at, updated_at FROM users";

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = $1"))
    .bind(email)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = $1"))
    .bind(username)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn insert(pool: &PgPool, username: &str, email: &str, password_hash: &str) -> Result<User> {
  let user = sqlx::query_as::<_, User>(
    "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
     RETURNING id, username, email, password_hash, role, created_at, updated_at",
  )
  .bind(username)
  .bind(email)
  .bind(password_hash)
  .fetch_one(pool)
  .await?;
  Ok(user)
}
