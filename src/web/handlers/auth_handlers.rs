// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db;
use crate::errors::AppError;
use crate::services::{auth_service, token_service};
use crate::state::AppState;
use crate::web::session::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestPayload {
  pub username: String,
  pub email: String,
  pub password: String,
  pub confirm_password: String,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

fn validate_signup(payload: &SignupRequestPayload) -> Result<(), AppError> {
  if payload.username.trim().is_empty() {
    return Err(AppError::Validation("Username is required.".to_string()));
  }
  if payload.email.is_empty() || !payload.email.contains('@') {
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if payload.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters.".to_string(),
    ));
  }
  if payload.password != payload.confirm_password {
    return Err(AppError::Validation("Passwords do not match.".to_string()));
  }
  Ok(())
}

// --- Handlers ---

#[instrument(
    name = "handler::signup",
    skip(app_state, payload),
    fields(req_email = %payload.email, req_username = %payload.username)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  validate_signup(&payload)?;

  // Username is checked before email, so a request failing both reports the
  // username conflict.
  if db::users::find_by_username(&app_state.db_pool, payload.username.trim())
    .await?
    .is_some()
  {
    return Err(AppError::Conflict("Username is already registered.".to_string()));
  }
  if db::users::find_by_email(&app_state.db_pool, &payload.email).await?.is_some() {
    return Err(AppError::Conflict("Email is already registered.".to_string()));
  }

  let password_hash = auth_service::hash_password(&payload.password)?;
  let user = db::users::insert(&app_state.db_pool, payload.username.trim(), &payload.email, &password_hash)
    .await
    .map_err(|e| match e {
      AppError::Sqlx(err) => AppError::from_db_unique(err, "Username or email is already registered."),
      other => other,
    })?;

  info!(user_id = %user.id, "User registered.");

  Ok(HttpResponse::Ok().json(json!({
      "user": user,
      "message": "Created user successfully"
  })))
}

#[instrument(name = "handler::signin", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  // Unknown email and wrong password are indistinguishable to the caller.
  let user = match db::users::find_by_email(&app_state.db_pool, &payload.email).await? {
    Some(user) => user,
    None => {
      warn!("Sign-in failed: unknown email.");
      return Err(AppError::Auth("Invalid email or password.".to_string()));
    }
  };

  if !auth_service::verify_password(&user.password_hash, &payload.password)? {
    warn!(user_id = %user.id, "Sign-in failed: password mismatch.");
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  }

  let claims = token_service::claims_for(&user, Utc::now().timestamp());
  let token = token_service::sign(&claims, &app_state.config.jwt_secret)?;

  info!(user_id = %user.id, role = ?user.role, "Sign-in successful, session token issued.");

  Ok(HttpResponse::Ok().json(json!({
      "token": token,
      "user": user
  })))
}

#[instrument(name = "handler::refresh", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn refresh_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let claims = token_service::refresh_if_near_expiry(auth_user.claims, Utc::now().timestamp());
  let token = token_service::sign(&claims, &app_state.config.jwt_secret)?;

  Ok(HttpResponse::Ok().json(json!({ "token": token })))
}
