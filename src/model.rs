//! API-facing view of a user and its license.
//!
//! The wire shape nests the license under the user, field names are
//! camelCase, and unset external ids serialize as 0.

use serde::Serialize;

use crate::entities::{device, user};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
  pub id: i64,
  pub telegram_id: i64,
  pub discord_id: i64,
  pub license: LicenseView,
  pub created_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseView {
  pub key: String,
  pub max_activations: i32,
  pub devices: Vec<DeviceView>,
  pub issued_at: i64,
  pub expires_at: i64,
  pub status: user::LicenseStatus,
}

#[derive(Debug, Serialize)]
pub struct DeviceView {
  pub hwid: String,
}

impl UserView {
  pub fn new(user: user::Model, devices: Vec<device::Model>) -> Self {
    Self {
      id: user.id,
      telegram_id: user.telegram_id.unwrap_or(0),
      discord_id: user.discord_id.unwrap_or(0),
      license: LicenseView {
        key: user.license_key,
        max_activations: user.max_activations,
        devices: devices
          .into_iter()
          .map(|device| DeviceView { hwid: device.hwid })
          .collect(),
        issued_at: user.issued_at,
        expires_at: user.expires_at,
        status: user.status,
      },
      created_at: user.created_at,
    }
  }
}
