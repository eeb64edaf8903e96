//! Public license verification

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use crate::{handlers, prelude::*, state::AppState};

#[derive(Debug, Deserialize)]
pub struct VerifyReq {
  pub license: String,
  pub hwid: String,
}

pub async fn verify(
  State(app): State<Arc<AppState>>,
  body: Result<Json<VerifyReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let req = handlers::body(body)?;
  if req.license.is_empty() || req.hwid.is_empty() {
    return Err(Error::InvalidRequest);
  }

  app.sv().license.verify(&req.license, &req.hwid).await?;

  Ok(Json(json::json!({ "message": "license is valid" })))
}
