//! Application state - the injected database handle plus configuration.

use tokio::time;

use crate::{config::Config, migration::Migrator, prelude::*, sv};

/// Connection setup retries at startup only; requests never retry.
const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_BACKOFF: Duration = Duration::from_secs(5);

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub device: sv::Device<'a>,
  pub license: sv::License<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("connecting to database");
    let mut attempts = 0;
    let db = loop {
      match Database::connect(&config.database_url).await {
        Ok(db) => break db,
        Err(err) => {
          attempts += 1;
          if attempts >= CONNECT_ATTEMPTS {
            return Err(err).context("failed to connect to database");
          }
          warn!("failed to connect to database: {err}, retrying");
          time::sleep(CONNECT_BACKOFF).await;
        }
      }
    };

    info!("running migrations");
    Migrator::up(&db, None).await.context("failed to run migrations")?;

    Ok(Self { db, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      device: sv::Device::new(&self.db),
      license: sv::License::new(&self.db),
    }
  }
}
