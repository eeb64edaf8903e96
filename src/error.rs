//! Error types for the license server

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("user not found")]
  UserNotFound,

  #[error("license not found")]
  LicenseNotFound,

  #[error("license not active")]
  LicenseNotActive,

  #[error("license expired")]
  LicenseExpired,

  /// Read path: a new device was presented while every slot is occupied.
  #[error("device limit reached, new device not allowed")]
  DeviceLimitReached,

  /// Write path: an activation slot was requested while every slot is
  /// occupied. Counts raw slots, so re-adding a present hwid also fails.
  #[error("maximum allowed activations reached")]
  CapacityExceeded,

  #[error("invalid request")]
  InvalidRequest,

  #[error("{0}")]
  Validation(String),

  /// Id/key generation exhausted its retry budget on unique collisions.
  #[error("user id or license key already exists")]
  Conflict,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Database(err) => {
        tracing::error!("database error: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Error::Conflict => {
        tracing::error!("insert rejected by unique constraint");
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Error::UserNotFound | Error::LicenseNotFound => StatusCode::NOT_FOUND,
      Error::LicenseNotActive
      | Error::LicenseExpired
      | Error::DeviceLimitReached
      | Error::CapacityExceeded => StatusCode::FORBIDDEN,
      Error::InvalidRequest | Error::Validation(_) => StatusCode::BAD_REQUEST,
    };

    // Internal detail is logged above and never echoed to the caller.
    let message = match &self {
      Error::Database(_) | Error::Conflict => "internal server error".into(),
      other => other.to_string(),
    };

    (status, Json(json::json!({ "error": message }))).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
