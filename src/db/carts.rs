// src/db/carts.rs

use crate::errors::Result;
use crate::models::{Cart, CartItem, CartItemView, Category, Product, ProductView};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Returns the user's cart, creating it atomically when absent. The no-op
/// `DO UPDATE` makes `RETURNING` yield the existing row on conflict, so two
/// concurrent first adds both land on the same cart.
pub async fn find_or_create(pool: &PgPool, user_id: Uuid) -> Result<Cart> {
  let cart = sqlx::query_as::<_, Cart>(
    "INSERT INTO carts (user_id) VALUES ($1) \
     ON CONFLICT (user_id) DO UPDATE SET user_id = excluded.user_id \
     RETURNING id, user_id, created_at",
  )
  .bind(user_id)
  .fetch_one(pool)
  .await?;
  Ok(cart)
}

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Cart>> {
  let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id, created_at FROM carts WHERE user_id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  Ok(cart)
}

/// Single-statement increment-or-insert for a line item. Concurrent adds for
/// the same (cart, product) pair serialize on the unique constraint instead
/// of producing duplicate rows.
pub async fn upsert_item(pool: &PgPool, cart_id: i32, product_id: i32, quantity: i32) -> Result<CartItem> {
  let item = sqlx::query_as::<_, CartItem>(
    "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
     ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + excluded.quantity \
     RETURNING id, cart_id, product_id, quantity",
  )
  .bind(cart_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;
  Ok(item)
}

#[derive(FromRow)]
struct ItemRow {
  id: i32,
  cart_id: i32,
  product_id: i32,
  quantity: i32,
  p_name: String,
  p_description: String,
  p_price: i32,
  p_stock: i32,
  p_image_url: String,
  p_category_id: Option<i32>,
  p_created_at: DateTime<Utc>,
  cat_id: Option<i32>,
  cat_name: Option<String>,
}

impl From<ItemRow> for CartItemView {
  fn from(row: ItemRow) -> Self {
    let category = match (row.cat_id, row.cat_name) {
      (Some(id), Some(name)) => Some(Category { id, name }),
      _ => None,
    };
    CartItemView {
      item: CartItem {
        id: row.id,
        cart_id: row.cart_id,
        product_id: row.product_id,
        quantity: row.quantity,
      },
      product: ProductView {
        product: Product {
          id: row.product_id,
          name: row.p_name,
          description: row.p_description,
          price: row.p_price,
          stock: row.p_stock,
          image_url: row.p_image_url,
          category_id: row.p_category_id,
          created_at: row.p_created_at,
        },
        category,
      },
    }
  }
}

/// All line items of a cart, each joined with its product and the product's
/// category.
pub async fn items(pool: &PgPool, cart_id: i32) -> Result<Vec<CartItemView>> {
  let rows = sqlx::query_as::<_, ItemRow>(
    "SELECT i.id, i.cart_id, i.product_id, i.quantity, \
            p.name AS p_name, p.description AS p_description, p.price AS p_price, p.stock AS p_stock, \
            p.image_url AS p_image_url, p.category_id AS p_category_id, p.created_at AS p_created_at, \
            c.id AS cat_id, c.name AS cat_name \
     FROM cart_items i \
     JOIN products p ON p.id = i.product_id \
     LEFT JOIN categories c ON c.id = p.category_id \
     WHERE i.cart_id = $1 \
     ORDER BY i.id ASC",
  )
  .bind(cart_id)
  .fetch_all(pool)
  .await?;
  Ok(rows.into_iter().map(CartItemView::from).collect())
}

#[derive(FromRow)]
pub struct OwnedItem {
  pub id: i32,
  pub cart_id: i32,
  pub owner_id: Uuid,
}

/// Fetches a line item together with the id of the user owning its cart, so
/// the caller can refuse cross-user deletion.
pub async fn find_item_with_owner(pool: &PgPool, item_id: i32) -> Result<Option<OwnedItem>> {
  let item = sqlx::query_as::<_, OwnedItem>(
    "SELECT i.id, i.cart_id, c.user_id AS owner_id \
     FROM cart_items i JOIN carts c ON c.id = i.cart_id \
     WHERE i.id = $1",
  )
  .bind(item_id)
  .fetch_optional(pool)
  .await?;
  Ok(item)
}

/// Removes the line item only. An emptied cart keeps its row.
pub async fn delete_item(pool: &PgPool, item_id: i32) -> Result<()> {
  sqlx::query("DELETE FROM cart_items WHERE id = $1")
    .bind(item_id)
    .execute(pool)
    .await?;
  Ok(())
}
