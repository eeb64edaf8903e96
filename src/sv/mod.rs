//! Business logic services

pub mod device;
pub mod license;
pub mod user;

pub use device::Device;
pub use license::License;
pub use user::{NewUser, Selector, User};

use sea_orm::DbErr;

use crate::error::Error;

/// Maps the zero-rows-matched update signal to a missing user. SQLite
/// counts a matched row as changed even when the new value equals the
/// old, so `RecordNotUpdated` means exactly "no such user", never
/// "value was already equal".
pub(crate) fn missing_user(err: DbErr) -> Error {
  match err {
    DbErr::RecordNotUpdated => Error::UserNotFound,
    err => Error::Database(err),
  }
}
