// src/web/session.rs

//! Session extraction for authenticated routes.

use crate::errors::AppError;
use crate::models::Role;
use crate::services::token_service::{self, Claims};
use crate::state::AppState;
use actix_web::{http::header, web, FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

/// The caller behind a `Authorization: Bearer <token>` header. Extraction
/// fails with a 401 before the handler body runs.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub role: Role,
  pub claims: Claims,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    futures_util::future::ready(extract_user(req))
  }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("AppState is not configured.".to_string()))?;

  let header_value = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| {
      warn!("Session extraction failed: missing Authorization header.");
      AppError::Auth("Unauthorized".to_string())
    })?;

  let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
    warn!("Session extraction failed: Authorization header is not a bearer token.");
    AppError::Auth("Unauthorized".to_string())
  })?;

  let claims = token_service::verify(token, &state.config.jwt_secret)?;

  Ok(AuthenticatedUser {
    user_id: claims.sub,
    role: claims.role,
    claims,
  })
}
