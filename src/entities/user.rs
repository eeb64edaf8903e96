//! User entity - the root aggregate, with its license flattened in.
//!
//! The license has no lifecycle of its own, so its columns live on the
//! user row rather than in a table that could outlive it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// License status. Any status may be set to any other by an admin;
/// only `Active` passes verification. `Frozen` (temporary suspension)
/// and `Burned` (permanent revocation) differ for reporting only.
#[derive(
  Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "frozen")]
  Frozen,
  #[sea_orm(string_value = "burned")]
  Burned,
}

impl Default for LicenseStatus {
  fn default() -> Self {
    Self::Active
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  /// Random 8-digit identifier, generated at creation.
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i64,
  pub telegram_id: Option<i64>,
  pub discord_id: Option<i64>,
  #[sea_orm(unique)]
  pub license_key: String,
  pub max_activations: i32,
  pub issued_at: i64,
  pub expires_at: i64,
  pub status: LicenseStatus,
  pub created_at: i64,
}

impl Model {
  pub fn is_active(&self) -> bool {
    self.status == LicenseStatus::Active
  }

  /// Expiry boundary is inclusive: a license expiring exactly now is
  /// already expired.
  pub fn is_expired(&self, now: i64) -> bool {
    now >= self.expires_at
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::device::Entity")]
  Devices,
}

impl Related<super::device::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Devices.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
