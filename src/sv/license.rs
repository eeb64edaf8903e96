//! License service - the verification engine and the admin mutations.

use crate::{
  entities::{device, user, user::LicenseStatus},
  prelude::*,
  sv::{self, Selector, missing_user},
};

/// Full license value for wholesale replacement.
#[derive(Debug, Clone)]
pub struct LicenseData {
  pub key: String,
  pub max_activations: i32,
  pub devices: Vec<String>,
  pub issued_at: i64,
  pub expires_at: i64,
  pub status: LicenseStatus,
}

pub struct License<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> License<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Read-only verification of a (key, hwid) pair. Never mutates state;
  /// registering a new hwid is a separate admin operation.
  pub async fn verify(&self, key: &str, hwid: &str) -> Result<()> {
    self.verify_at(key, hwid, Utc::now().timestamp()).await
  }

  /// Checks run in a fixed order and the first failure wins: unknown
  /// key, status, device limit, expiry. Expiry comes after the limit
  /// check; callers observe that precedence.
  pub async fn verify_at(&self, key: &str, hwid: &str, now: i64) -> Result<()> {
    let user = sv::User::new(self.db)
      .try_find(Selector::LicenseKey(key.into()))
      .await?
      .ok_or(Error::LicenseNotFound)?;

    if !user.is_active() {
      return Err(Error::LicenseNotActive);
    }

    let devices = sv::Device::new(self.db).list(user.id).await?;
    let registered = devices.iter().any(|device| device.hwid == hwid);

    // A returning device is let through even at capacity; only a new
    // hwid is turned away.
    if devices.len() as i32 >= user.max_activations && !registered {
      return Err(Error::DeviceLimitReached);
    }

    if user.is_expired(now) {
      return Err(Error::LicenseExpired);
    }

    Ok(())
  }

  pub async fn set_status(
    &self,
    user_id: i64,
    status: LicenseStatus,
  ) -> Result<()> {
    user::ActiveModel {
      id: Set(user_id),
      status: Set(status),
      ..Default::default()
    }
    .update(self.db)
    .await
    .map_err(missing_user)?;
    Ok(())
  }

  pub async fn set_max_activations(
    &self,
    user_id: i64,
    max_activations: i32,
  ) -> Result<()> {
    if max_activations < 1 {
      return Err(Error::Validation("max_activations must be positive".into()));
    }

    user::ActiveModel {
      id: Set(user_id),
      max_activations: Set(max_activations),
      ..Default::default()
    }
    .update(self.db)
    .await
    .map_err(missing_user)?;
    Ok(())
  }

  pub async fn renew(&self, user_id: i64, expires_at: i64) -> Result<()> {
    user::ActiveModel {
      id: Set(user_id),
      expires_at: Set(expires_at),
      ..Default::default()
    }
    .update(self.db)
    .await
    .map_err(missing_user)?;
    Ok(())
  }

  /// Replaces the embedded license wholesale, device list included.
  pub async fn replace(&self, user_id: i64, license: LicenseData) -> Result<()> {
    if license.max_activations < 1 {
      return Err(Error::Validation("max_activations must be positive".into()));
    }
    if license.devices.len() as i32 > license.max_activations {
      return Err(Error::CapacityExceeded);
    }

    let txn = self.db.begin().await?;

    user::ActiveModel {
      id: Set(user_id),
      license_key: Set(license.key),
      max_activations: Set(license.max_activations),
      issued_at: Set(license.issued_at),
      expires_at: Set(license.expires_at),
      status: Set(license.status),
      ..Default::default()
    }
    .update(&txn)
    .await
    .map_err(missing_user)?;

    device::Entity::delete_many()
      .filter(device::Column::UserId.eq(user_id))
      .exec(&txn)
      .await?;
    for hwid in &license.devices {
      device::ActiveModel {
        user_id: Set(user_id),
        hwid: Set(hwid.clone()),
        ..Default::default()
      }
      .insert(&txn)
      .await?;
    }

    txn.commit().await?;

    debug!("replaced license for user {user_id}");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::{
    Device,
    testing::{seed_user, setup_db},
  };

  const NOW: i64 = 1_700_000_000;
  const FUTURE: i64 = NOW + 3600;
  const PAST: i64 = NOW - 3600;

  #[tokio::test]
  async fn unknown_key_is_license_not_found() {
    let db = setup_db().await;
    assert!(matches!(
      License::new(&db).verify_at("NO-SUCH-KEY", "hwid-a", NOW).await,
      Err(Error::LicenseNotFound)
    ));
  }

  #[tokio::test]
  async fn inactive_status_precedes_every_other_check() {
    let db = setup_db().await;
    let sv = License::new(&db);
    // Expired AND at capacity: status still decides first.
    let user = seed_user(&db, 1, PAST).await;
    Device::new(&db).add(user.id, "hwid-a").await.unwrap();

    for status in [LicenseStatus::Frozen, LicenseStatus::Burned] {
      sv.set_status(user.id, status).await.unwrap();
      assert!(matches!(
        sv.verify_at(&user.license_key, "hwid-new", NOW).await,
        Err(Error::LicenseNotActive)
      ));
    }
  }

  #[tokio::test]
  async fn new_device_at_capacity_is_rejected_before_expiry() {
    let db = setup_db().await;
    let sv = License::new(&db);
    // Expired as well: the limit error wins for a new device.
    let user = seed_user(&db, 2, PAST).await;
    Device::new(&db).add(user.id, "hwid-a").await.unwrap();
    Device::new(&db).add(user.id, "hwid-b").await.unwrap();

    assert!(matches!(
      sv.verify_at(&user.license_key, "hwid-c", NOW).await,
      Err(Error::DeviceLimitReached)
    ));
  }

  #[tokio::test]
  async fn registered_device_passes_at_capacity() {
    let db = setup_db().await;
    let sv = License::new(&db);
    let user = seed_user(&db, 2, FUTURE).await;
    Device::new(&db).add(user.id, "hwid-a").await.unwrap();
    Device::new(&db).add(user.id, "hwid-b").await.unwrap();

    sv.verify_at(&user.license_key, "hwid-a", NOW).await.unwrap();
  }

  #[tokio::test]
  async fn registered_device_at_capacity_still_hits_expiry() {
    let db = setup_db().await;
    let sv = License::new(&db);
    let user = seed_user(&db, 2, PAST).await;
    Device::new(&db).add(user.id, "hwid-a").await.unwrap();
    Device::new(&db).add(user.id, "hwid-b").await.unwrap();

    assert!(matches!(
      sv.verify_at(&user.license_key, "hwid-a", NOW).await,
      Err(Error::LicenseExpired)
    ));
  }

  #[tokio::test]
  async fn expiry_boundary_is_inclusive() {
    let db = setup_db().await;
    let sv = License::new(&db);
    let user = seed_user(&db, 2, NOW).await;

    assert!(matches!(
      sv.verify_at(&user.license_key, "hwid-a", NOW).await,
      Err(Error::LicenseExpired)
    ));

    sv.renew(user.id, FUTURE).await.unwrap();
    sv.verify_at(&user.license_key, "hwid-a", NOW).await.unwrap();
  }

  #[tokio::test]
  async fn raising_the_limit_admits_new_devices() {
    let db = setup_db().await;
    let sv = License::new(&db);
    let user = seed_user(&db, 1, FUTURE).await;
    Device::new(&db).add(user.id, "hwid-a").await.unwrap();

    assert!(matches!(
      sv.verify_at(&user.license_key, "hwid-b", NOW).await,
      Err(Error::DeviceLimitReached)
    ));

    sv.set_max_activations(user.id, 2).await.unwrap();
    sv.verify_at(&user.license_key, "hwid-b", NOW).await.unwrap();

    assert!(matches!(
      sv.set_max_activations(user.id, 0).await,
      Err(Error::Validation(_))
    ));
  }

  #[tokio::test]
  async fn setters_report_missing_users() {
    let db = setup_db().await;
    let sv = License::new(&db);

    assert!(matches!(
      sv.set_status(1, LicenseStatus::Frozen).await,
      Err(Error::UserNotFound)
    ));
    assert!(matches!(
      sv.set_max_activations(1, 2).await,
      Err(Error::UserNotFound)
    ));
    assert!(matches!(sv.renew(1, FUTURE).await, Err(Error::UserNotFound)));
  }

  #[tokio::test]
  async fn replace_swaps_license_and_devices() {
    let db = setup_db().await;
    let sv = License::new(&db);
    let user = seed_user(&db, 1, PAST).await;
    Device::new(&db).add(user.id, "hwid-old").await.unwrap();

    sv.replace(
      user.id,
      LicenseData {
        key: "NEW-KEY".into(),
        max_activations: 2,
        devices: vec!["hwid-1".into(), "hwid-2".into()],
        issued_at: NOW,
        expires_at: FUTURE,
        status: LicenseStatus::Active,
      },
    )
    .await
    .unwrap();

    sv.verify_at("NEW-KEY", "hwid-1", NOW).await.unwrap();
    assert!(matches!(
      sv.verify_at(&user.license_key, "hwid-1", NOW).await,
      Err(Error::LicenseNotFound)
    ));

    let hwids: Vec<_> = Device::new(&db)
      .list(user.id)
      .await
      .unwrap()
      .into_iter()
      .map(|d| d.hwid)
      .collect();
    assert_eq!(hwids, ["hwid-1", "hwid-2"]);
  }
}
