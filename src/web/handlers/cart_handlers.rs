// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::CartView;
use crate::state::AppState;
use crate::web::session::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  pub user_id: Uuid,
  pub product_id: i32,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemPayload {
  pub item_id: Option<i32>,
}

// --- Handlers ---

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, payload),
    fields(user_id = %payload.user_id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.quantity <= 0 {
    warn!("Invalid quantity ({}) provided. Must be positive.", payload.quantity);
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }

  // Both steps are single-statement upserts: concurrent adds for the same
  // user converge on one cart, and on one line item per product.
  let cart = db::carts::find_or_create(&app_state.db_pool, payload.user_id).await?;
  let item = db::carts::upsert_item(&app_state.db_pool, cart.id, payload.product_id, payload.quantity).await?;

  info!(
    cart_id = cart.id,
    item_id = item.id,
    new_quantity = item.quantity,
    "Cart item added or incremented."
  );

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Item added to cart"
  })))
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = match db::carts::find_by_user(&app_state.db_pool, auth_user.user_id).await? {
    Some(cart) => cart,
    None => {
      // Listing never requires a cart to pre-exist.
      return Ok(HttpResponse::Ok().json(json!({
          "message": "Cart not found",
          "cart": { "items": [] }
      })));
    }
  };

  let items = db::carts::items(&app_state.db_pool, cart.id).await?;
  Ok(HttpResponse::Ok().json(CartView { cart, items }))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RemoveItemPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item_id = payload
    .item_id
    .ok_or_else(|| AppError::Validation("Item ID is required".to_string()))?;

  // An item owned by another user's cart is reported exactly like a missing
  // one, so ids cannot be probed across users.
  match db::carts::find_item_with_owner(&app_state.db_pool, item_id).await? {
    Some(item) if item.owner_id == auth_user.user_id => {
      db::carts::delete_item(&app_state.db_pool, item_id).await?;
      info!(item_id, cart_id = item.cart_id, "Cart item removed.");
      Ok(HttpResponse::Ok().json(json!({ "message": "Item removed successfully" })))
    }
    _ => Err(AppError::NotFound("Item not found".to_string())),
  }
}
