//! Admin user/license management

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::{
  entities::user::LicenseStatus,
  handlers,
  model::UserView,
  prelude::*,
  state::AppState,
  sv::{NewUser, Selector},
  utils,
};

#[derive(Debug, Deserialize)]
pub struct CreateUserReq {
  #[serde(default)]
  pub telegram_id: Option<i64>,
  #[serde(default)]
  pub discord_id: Option<i64>,
  pub max_activations: i32,
  pub expires_at: i64,
}

pub async fn create_user(
  State(app): State<Arc<AppState>>,
  body: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let req = handlers::body(body)?;
  if req.expires_at == 0 {
    return Err(Error::InvalidRequest);
  }

  let key = utils::license_key(
    app.config.license_prefix.as_deref(),
    app.config.license_length,
  );
  let user = app
    .sv()
    .user
    .create(NewUser {
      // Zero means unset on the wire.
      telegram_id: req.telegram_id.filter(|&id| id != 0),
      discord_id: req.discord_id.filter(|&id| id != 0),
      license_key: key,
      max_activations: req.max_activations,
      expires_at: req.expires_at,
    })
    .await?;

  info!("created user {}", user.id);
  Ok(Json(json::json!({
    "status": "success",
    "user": UserView::new(user, vec![]),
  })))
}

#[derive(Debug, Deserialize)]
pub struct GetUserQuery {
  pub telegram_id: Option<String>,
  pub discord_id: Option<String>,
  pub license: Option<String>,
}

pub async fn get_user(
  State(app): State<Arc<AppState>>,
  Query(query): Query<GetUserQuery>,
) -> Result<Json<json::Value>> {
  let selector = if let Some(raw) = query.telegram_id {
    Selector::TelegramId(raw.parse().map_err(|_| {
      Error::Validation("telegram_id must be an integer".into())
    })?)
  } else if let Some(raw) = query.discord_id {
    Selector::DiscordId(raw.parse().map_err(|_| {
      Error::Validation("discord_id must be an integer".into())
    })?)
  } else if let Some(license) = query.license {
    Selector::LicenseKey(license)
  } else {
    return Err(Error::Validation(
      "at least telegram_id, discord_id or license must be provided".into(),
    ));
  };

  let sv = app.sv();
  let user = sv.user.find(selector).await?;
  let devices = sv.device.list(user.id).await?;

  Ok(Json(json::json!({
    "status": "success",
    "user": UserView::new(user, devices),
  })))
}

#[derive(Debug, Deserialize)]
pub struct DeviceReq {
  pub hwid: String,
}

pub async fn add_device(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<DeviceReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;
  if req.hwid.is_empty() {
    return Err(Error::InvalidRequest);
  }

  app.sv().device.add(user_id, &req.hwid).await?;
  Ok(success())
}

pub async fn remove_device(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<DeviceReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;
  if req.hwid.is_empty() {
    return Err(Error::InvalidRequest);
  }

  app.sv().device.remove(user_id, &req.hwid).await?;
  Ok(success())
}

pub async fn reset_devices(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;

  app.sv().device.reset(user_id).await?;
  Ok(success())
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusReq {
  pub status: LicenseStatus,
}

pub async fn change_license_status(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<ChangeStatusReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;

  app.sv().license.set_status(user_id, req.status).await?;
  Ok(success())
}

#[derive(Debug, Deserialize)]
pub struct HwidLimitReq {
  pub max_activations: i32,
}

pub async fn update_hwid_limit(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<HwidLimitReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;

  app.sv().license.set_max_activations(user_id, req.max_activations).await?;
  Ok(success())
}

#[derive(Debug, Deserialize)]
pub struct RenewLicenseReq {
  pub expires_at: i64,
}

pub async fn renew_license(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<RenewLicenseReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;
  if req.expires_at == 0 {
    return Err(Error::InvalidRequest);
  }

  app.sv().license.renew(user_id, req.expires_at).await?;
  Ok(success())
}

#[derive(Debug, Deserialize)]
pub struct BindDiscordReq {
  pub discord_id: i64,
}

pub async fn bind_discord(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<BindDiscordReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;
  if req.discord_id == 0 {
    return Err(Error::InvalidRequest);
  }

  app.sv().user.bind_discord(user_id, req.discord_id).await?;
  Ok(success())
}

#[derive(Debug, Deserialize)]
pub struct BindTelegramReq {
  pub telegram_id: i64,
}

pub async fn bind_telegram(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<BindTelegramReq>, JsonRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;
  let req = handlers::body(body)?;
  if req.telegram_id == 0 {
    return Err(Error::InvalidRequest);
  }

  app.sv().user.bind_telegram(user_id, req.telegram_id).await?;
  Ok(success())
}

pub async fn delete_user(
  State(app): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<json::Value>> {
  let user_id = handlers::user_id(path)?;

  app.sv().user.delete(user_id).await?;
  info!("deleted user {user_id}");
  Ok(success())
}

fn success() -> Json<json::Value> {
  Json(json::json!({ "status": "success" }))
}
