//! Device slot manager - admission control over a bounded slot pool.
//!
//! The admission rule is capacity-gated, not identity-deduplicated: a
//! hwid that is already present still consumes a slot on re-add. The
//! read-path verification engine applies the more permissive
//! identity-aware rule instead (see `sv::license`).

use crate::{
  entities::{device, user},
  prelude::*,
};

pub struct Device<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Device<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Occupies one activation slot. The append and the capacity check are
  /// one conditional statement, so concurrent adds cannot both observe an
  /// under-capacity snapshot and overshoot the limit.
  pub async fn add(&self, user_id: i64, hwid: &str) -> Result<()> {
    let stmt = Statement::from_sql_and_values(
      self.db.get_database_backend(),
      r#"INSERT INTO devices (user_id, hwid)
         SELECT ?, ?
         WHERE (SELECT COUNT(*) FROM devices WHERE user_id = ?)
             < COALESCE((SELECT max_activations FROM users WHERE id = ?), 0)"#,
      [user_id.into(), hwid.into(), user_id.into(), user_id.into()],
    );

    let res = self.db.execute(stmt).await?;
    if res.rows_affected() == 0 {
      // Zero rows is either a missing user or a full slot pool.
      user::Entity::find_by_id(user_id)
        .one(self.db)
        .await?
        .ok_or(Error::UserNotFound)?;
      return Err(Error::CapacityExceeded);
    }
    Ok(())
  }

  /// Frees every slot occupied by `hwid`, duplicates included. An absent
  /// hwid is a no-op, not an error.
  pub async fn remove(&self, user_id: i64, hwid: &str) -> Result<()> {
    user::Entity::find_by_id(user_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    device::Entity::delete_many()
      .filter(device::Column::UserId.eq(user_id))
      .filter(device::Column::Hwid.eq(hwid))
      .exec(self.db)
      .await?;
    Ok(())
  }

  /// Frees every slot. Idempotent.
  pub async fn reset(&self, user_id: i64) -> Result<()> {
    user::Entity::find_by_id(user_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    device::Entity::delete_many()
      .filter(device::Column::UserId.eq(user_id))
      .exec(self.db)
      .await?;
    Ok(())
  }

  /// Replaces the whole slot list, preserving the given order.
  pub async fn set_all(&self, user_id: i64, hwids: &[String]) -> Result<()> {
    let txn = self.db.begin().await?;

    let user = user::Entity::find_by_id(user_id)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;
    if hwids.len() as i32 > user.max_activations {
      return Err(Error::CapacityExceeded);
    }

    device::Entity::delete_many()
      .filter(device::Column::UserId.eq(user_id))
      .exec(&txn)
      .await?;
    for hwid in hwids {
      device::ActiveModel {
        user_id: Set(user_id),
        hwid: Set(hwid.clone()),
        ..Default::default()
      }
      .insert(&txn)
      .await?;
    }

    txn.commit().await?;
    Ok(())
  }

  /// Occupied slots in activation order.
  pub async fn list(&self, user_id: i64) -> Result<Vec<device::Model>> {
    let devices = device::Entity::find()
      .filter(device::Column::UserId.eq(user_id))
      .order_by_asc(device::Column::Id)
      .all(self.db)
      .await?;
    Ok(devices)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::testing::{seed_user, setup_db};

  #[tokio::test]
  async fn add_appends_in_activation_order() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 3, 1).await;

    sv.add(user.id, "hwid-a").await.unwrap();
    sv.add(user.id, "hwid-b").await.unwrap();

    let devices = sv.list(user.id).await.unwrap();
    let hwids: Vec<_> = devices.iter().map(|d| d.hwid.as_str()).collect();
    assert_eq!(hwids, ["hwid-a", "hwid-b"]);
  }

  #[tokio::test]
  async fn add_rejects_at_capacity_even_for_present_hwid() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 2, 1).await;

    sv.add(user.id, "hwid-a").await.unwrap();
    sv.add(user.id, "hwid-b").await.unwrap();

    // Capacity counts raw slots, so a re-add of a present hwid also fails.
    assert!(matches!(
      sv.add(user.id, "hwid-a").await,
      Err(Error::CapacityExceeded)
    ));
    assert!(matches!(
      sv.add(user.id, "hwid-c").await,
      Err(Error::CapacityExceeded)
    ));
    assert_eq!(sv.list(user.id).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn add_allows_duplicates_under_capacity() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 3, 1).await;

    sv.add(user.id, "hwid-a").await.unwrap();
    sv.add(user.id, "hwid-a").await.unwrap();
    assert_eq!(sv.list(user.id).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn add_unknown_user() {
    let db = setup_db().await;
    assert!(matches!(
      Device::new(&db).add(1, "hwid-a").await,
      Err(Error::UserNotFound)
    ));
  }

  #[tokio::test]
  async fn remove_purges_all_matches_and_is_idempotent() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 4, 1).await;

    sv.add(user.id, "hwid-a").await.unwrap();
    sv.add(user.id, "hwid-b").await.unwrap();
    sv.add(user.id, "hwid-a").await.unwrap();

    sv.remove(user.id, "hwid-a").await.unwrap();
    let hwids: Vec<_> = sv
      .list(user.id)
      .await
      .unwrap()
      .into_iter()
      .map(|d| d.hwid)
      .collect();
    assert_eq!(hwids, ["hwid-b"]);

    // Absent hwid: error-free no-op.
    sv.remove(user.id, "hwid-a").await.unwrap();
    assert_eq!(sv.list(user.id).await.unwrap().len(), 1);

    assert!(matches!(
      sv.remove(1, "hwid-a").await,
      Err(Error::UserNotFound)
    ));
  }

  #[tokio::test]
  async fn reset_empties_and_is_idempotent() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 2, 1).await;

    sv.add(user.id, "hwid-a").await.unwrap();
    sv.reset(user.id).await.unwrap();
    assert!(sv.list(user.id).await.unwrap().is_empty());

    sv.reset(user.id).await.unwrap();
    assert!(sv.list(user.id).await.unwrap().is_empty());

    assert!(matches!(sv.reset(1).await, Err(Error::UserNotFound)));
  }

  #[tokio::test]
  async fn set_all_replaces_and_enforces_capacity() {
    let db = setup_db().await;
    let sv = Device::new(&db);
    let user = seed_user(&db, 2, 1).await;

    sv.add(user.id, "hwid-old").await.unwrap();
    sv.set_all(user.id, &["hwid-1".into(), "hwid-2".into()]).await.unwrap();

    let hwids: Vec<_> = sv
      .list(user.id)
      .await
      .unwrap()
      .into_iter()
      .map(|d| d.hwid)
      .collect();
    assert_eq!(hwids, ["hwid-1", "hwid-2"]);

    let over: Vec<String> =
      ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert!(matches!(
      sv.set_all(user.id, &over).await,
      Err(Error::CapacityExceeded)
    ));
  }

  #[tokio::test]
  async fn concurrent_adds_never_overshoot_capacity() {
    let db = setup_db().await;
    let user = seed_user(&db, 3, 1).await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
      let db = db.clone();
      let user_id = user.id;
      tasks.spawn(async move {
        let _ = Device::new(&db).add(user_id, &format!("hwid-{i}")).await;
      });
    }
    while let Some(res) = tasks.join_next().await {
      res.unwrap();
    }

    assert!(Device::new(&db).list(user.id).await.unwrap().len() <= 3);
  }
}
