//! Admin authentication middleware

use std::sync::Arc;

use axum::{
  Json,
  extract::{Request, State},
  http::StatusCode,
  middleware::Next,
  response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// Gates the admin surface on the `X-API-Key` header. The comparison is
/// constant time.
pub async fn admin_auth(
  State(app): State<Arc<AppState>>,
  req: Request,
  next: Next,
) -> Response {
  let Some(header) =
    req.headers().get("x-api-key").and_then(|value| value.to_str().ok())
  else {
    return unauthorized("API key required");
  };

  let valid: bool = header
    .as_bytes()
    .ct_eq(app.config.admin_key.as_bytes())
    .into();
  if !valid {
    return unauthorized("Invalid API key");
  }

  next.run(req).await
}

fn unauthorized(message: &str) -> Response {
  (StatusCode::UNAUTHORIZED, Json(json::json!({ "error": message })))
    .into_response()
}
