//! User repository - creation, lookup, deletion, identity binding

use sea_orm::SqlErr;

use crate::{
  entities::{device, user, user::LicenseStatus},
  prelude::*,
  sv::missing_user,
  utils,
};

/// Lookup key: exactly one dimension by construction.
#[derive(Debug, Clone)]
pub enum Selector {
  Id(i64),
  TelegramId(i64),
  DiscordId(i64),
  LicenseKey(String),
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub telegram_id: Option<i64>,
  pub discord_id: Option<i64>,
  pub license_key: String,
  pub max_activations: i32,
  pub expires_at: i64,
}

/// Random ids can collide; the store's primary key is authoritative and
/// we re-roll a bounded number of times before giving up.
const CREATE_ATTEMPTS: u32 = 3;

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(&self, new: NewUser) -> Result<user::Model> {
    if new.telegram_id.is_none() && new.discord_id.is_none() {
      return Err(Error::Validation(
        "at least discord or telegram ID must be provided".into(),
      ));
    }
    if new.max_activations < 1 {
      return Err(Error::Validation("max_activations must be positive".into()));
    }

    let now = Utc::now().timestamp();
    let mut attempts = 0;
    loop {
      let id = utils::user_id();
      let model = user::ActiveModel {
        id: Set(id),
        telegram_id: Set(new.telegram_id),
        discord_id: Set(new.discord_id),
        license_key: Set(new.license_key.clone()),
        max_activations: Set(new.max_activations),
        issued_at: Set(now),
        expires_at: Set(new.expires_at),
        status: Set(LicenseStatus::Active),
        created_at: Set(now),
      };

      match model.insert(self.db).await {
        Ok(user) => return Ok(user),
        Err(err) if is_unique_violation(&err) => {
          attempts += 1;
          if attempts >= CREATE_ATTEMPTS {
            return Err(Error::Conflict);
          }
          warn!("user id {id} collided, regenerating");
        }
        Err(err) => return Err(err.into()),
      }
    }
  }

  pub async fn find(&self, selector: Selector) -> Result<user::Model> {
    self.try_find(selector).await?.ok_or(Error::UserNotFound)
  }

  pub async fn try_find(
    &self,
    selector: Selector,
  ) -> Result<Option<user::Model>> {
    let query = match selector {
      Selector::Id(id) => user::Entity::find_by_id(id),
      Selector::TelegramId(id) => {
        user::Entity::find().filter(user::Column::TelegramId.eq(id))
      }
      Selector::DiscordId(id) => {
        user::Entity::find().filter(user::Column::DiscordId.eq(id))
      }
      Selector::LicenseKey(key) => {
        user::Entity::find().filter(user::Column::LicenseKey.eq(key))
      }
    };

    Ok(query.one(self.db).await?)
  }

  /// Administrative export. Unpaginated by design at current scale.
  pub async fn all(&self) -> Result<Vec<user::Model>> {
    let users = user::Entity::find()
      .order_by_asc(user::Column::CreatedAt)
      .all(self.db)
      .await?;
    Ok(users)
  }

  pub async fn delete(&self, user_id: i64) -> Result<()> {
    let txn = self.db.begin().await?;

    device::Entity::delete_many()
      .filter(device::Column::UserId.eq(user_id))
      .exec(&txn)
      .await?;
    let res = user::Entity::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    if res.rows_affected == 0 {
      return Err(Error::UserNotFound);
    }
    Ok(())
  }

  pub async fn bind_telegram(
    &self,
    user_id: i64,
    telegram_id: i64,
  ) -> Result<()> {
    user::ActiveModel {
      id: Set(user_id),
      telegram_id: Set(Some(telegram_id)),
      ..Default::default()
    }
    .update(self.db)
    .await
    .map_err(missing_user)?;
    Ok(())
  }

  pub async fn bind_discord(
    &self,
    user_id: i64,
    discord_id: i64,
  ) -> Result<()> {
    user::ActiveModel {
      id: Set(user_id),
      discord_id: Set(Some(discord_id)),
      ..Default::default()
    }
    .update(self.db)
    .await
    .map_err(missing_user)?;
    Ok(())
  }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
  matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
