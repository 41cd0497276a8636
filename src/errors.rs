// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Asset Store Error: {0}")]
  Asset(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in bootstrap code that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl AppError {
  /// Wraps a database error, surfacing unique-index violations as `Conflict`.
  ///
  /// Name uniqueness on categories and the one-cart-per-user constraint are
  /// enforced by the schema; a concurrent writer losing that race should see
  /// a 409, not a 500.
  pub fn from_db_unique(err: sqlx::Error, conflict_msg: &str) -> Self {
    if let sqlx::Error::Database(db_err) = &err {
      if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
        return AppError::Conflict(conflict_msg.to_string());
      }
    }
    AppError::Sqlx(err)
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Asset(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Asset store operation failed", "detail": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn error_kinds_map_to_expected_statuses() {
    let cases = [
      (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
      (AppError::Auth("no".into()), StatusCode::UNAUTHORIZED),
      (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
      (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
      (AppError::Asset("upload".into()), StatusCode::INTERNAL_SERVER_ERROR),
      (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
      assert_eq!(err.error_response().status(), expected, "{err}");
    }
  }

  #[test]
  fn row_not_found_is_a_database_error_not_a_404() {
    // NotFound responses are explicit preconditions in the handlers; a bare
    // RowNotFound bubbling up means a query was written wrong.
    let err = AppError::Sqlx(sqlx::Error::RowNotFound);
    assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
