//! HTTP handlers

pub mod license;
pub mod user;

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::prelude::*;

pub async fn ping() -> Json<json::Value> {
  Json(json::json!({ "message": "pong" }))
}

/// Malformed or missing bodies surface as a generic 400 with no
/// field-level detail; the parser's complaint goes to the debug log.
pub(crate) fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T> {
  match body {
    Ok(Json(req)) => Ok(req),
    Err(err) => {
      debug!("invalid request body: {err}");
      Err(Error::InvalidRequest)
    }
  }
}

pub(crate) fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64> {
  match path {
    Ok(Path(user_id)) => Ok(user_id),
    Err(err) => {
      debug!("invalid user_id: {err}");
      Err(Error::Validation("user_id must be an integer".into()))
    }
  }
}
