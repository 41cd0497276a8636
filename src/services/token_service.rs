// src/services/token_service.rs

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs whose lifetime depends on the holder's role: admin
//! sessions are short-lived, customer sessions last a day. Expiry extension
//! is a pure function over the claims so it can be exercised without any
//! request context.

use crate::errors::AppError;
use crate::models::{Role, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

pub const ADMIN_SESSION_SECS: i64 = 60 * 60;
pub const CUSTOMER_SESSION_SECS: i64 = 24 * 60 * 60;

/// Tokens closer than this to expiring are re-extended on refresh.
pub const REFRESH_WINDOW_SECS: i64 = 10 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
  /// The user id.
  pub sub: Uuid,
  pub username: String,
  pub email: String,
  pub role: Role,
  /// Expiration time, seconds since the epoch.
  pub exp: i64,
}

pub fn session_ttl(role: Role) -> i64 {
  match role {
    Role::Admin => ADMIN_SESSION_SECS,
    Role::Customer => CUSTOMER_SESSION_SECS,
  }
}

pub fn claims_for(user: &User, now: i64) -> Claims {
  Claims {
    sub: user.id,
    username: user.username.clone(),
    email: user.email.clone(),
    role: user.role,
    exp: now + session_ttl(user.role),
  }
}

/// Extends the expiry by the role-dependent window when the token is within
/// [`REFRESH_WINDOW_SECS`] of expiring; otherwise the claims pass through
/// untouched.
pub fn refresh_if_near_expiry(mut claims: Claims, now: i64) -> Claims {
  if claims.exp - now <= REFRESH_WINDOW_SECS {
    claims.exp = now + session_ttl(claims.role);
  }
  claims
}

#[instrument(name = "token_service::sign", skip_all, fields(user_id = %claims.sub))]
pub fn sign(claims: &Claims, secret: &str) -> Result<String, AppError> {
  encode(
    &Header::default(),
    claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Validates signature and expiry; any failure is an authentication error.
#[instrument(name = "token_service::verify", skip_all)]
pub fn verify(token: &str, secret: &str) -> Result<Claims, AppError> {
  decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|e| AppError::Auth(format!("Invalid or expired session token: {}", e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  const SECRET: &str = "test-secret";

  fn customer_claims(exp: i64) -> Claims {
    Claims {
      sub: Uuid::new_v4(),
      username: "budi".to_string(),
      email: "budi@example.com".to_string(),
      role: Role::Customer,
      exp,
    }
  }

  #[test]
  fn sign_then_verify_roundtrip() {
    let claims = customer_claims(Utc::now().timestamp() + 3600);
    let token = sign(&claims, SECRET).unwrap();
    let decoded = verify(&token, SECRET).unwrap();
    assert_eq!(decoded, claims);
  }

  #[test]
  fn verify_rejects_wrong_secret() {
    let claims = customer_claims(Utc::now().timestamp() + 3600);
    let token = sign(&claims, SECRET).unwrap();
    assert!(matches!(verify(&token, "other-secret"), Err(AppError::Auth(_))));
  }

  #[test]
  fn verify_rejects_expired_token() {
    // Well past jsonwebtoken's default leeway.
    let claims = customer_claims(Utc::now().timestamp() - 3600);
    let token = sign(&claims, SECRET).unwrap();
    assert!(matches!(verify(&token, SECRET), Err(AppError::Auth(_))));
  }

  #[test]
  fn refresh_extends_only_inside_the_window() {
    let now = 1_700_000_000;

    // 5 minutes left: extended by the customer ttl.
    let near = customer_claims(now + 5 * 60);
    assert_eq!(refresh_if_near_expiry(near, now).exp, now + CUSTOMER_SESSION_SECS);

    // 11 minutes left: untouched.
    let far = customer_claims(now + 11 * 60);
    assert_eq!(refresh_if_near_expiry(far.clone(), now).exp, far.exp);
  }

  #[test]
  fn refresh_uses_role_dependent_ttl() {
    let now = 1_700_000_000;
    let mut admin = customer_claims(now + 60);
    admin.role = Role::Admin;
    assert_eq!(refresh_if_near_expiry(admin, now).exp, now + ADMIN_SESSION_SECS);
  }

  #[test]
  fn session_ttls_match_roles() {
    assert_eq!(session_ttl(Role::Admin), 3600);
    assert_eq!(session_ttl(Role::Customer), 86400);
  }
}
