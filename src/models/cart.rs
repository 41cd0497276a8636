// src/models/cart.rs

use crate::models::product::ProductView;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub id: i32,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: i32,
  pub cart_id: i32,
  pub product_id: i32,
  pub quantity: i32,
}

/// A line item joined with its product (and the product's category).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
  #[serde(flatten)]
  pub item: CartItem,
  pub product: ProductView,
}

/// The cart as the customer surface consumes it: the cart row with all line
/// items nested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  #[serde(flatten)]
  pub cart: Cart,
  pub items: Vec<CartItemView>,
}
