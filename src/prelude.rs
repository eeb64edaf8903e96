pub use std::time::Duration;

pub use anyhow::Context as _;
pub use chrono::Utc;
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, ConnectionTrait, Database,
  DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, Statement,
  TransactionTrait,
};
pub use sea_orm_migration::MigratorTrait;
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
