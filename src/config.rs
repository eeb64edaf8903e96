//! Environment-driven configuration

use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub admin_key: String,
  pub license_prefix: Option<String>,
  pub license_length: usize,
  pub port: u16,
  pub rate_limit_per_second: u64,
  pub rate_limit_burst: u32,
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let database_url = env::var("DATABASE_URL")
      .unwrap_or_else(|_| "sqlite:licenses.db?mode=rwc".into());

    let admin_key =
      env::var("ADMIN_SECRET_KEY").context("ADMIN_SECRET_KEY not set")?;
    anyhow::ensure!(!admin_key.is_empty(), "ADMIN_SECRET_KEY must not be empty");

    let license_prefix =
      env::var("LICENSE_PREFIX").ok().filter(|s| !s.is_empty());

    let license_length = env::var("LICENSE_LENGTH")
      .ok()
      .and_then(|v| v.parse().ok())
      .filter(|&n: &usize| n > 0)
      .unwrap_or(16);

    let port =
      env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);

    let rate_limit_per_second = env::var("RATE_LIMIT_PER_SECOND")
      .ok()
      .and_then(|v| v.parse().ok())
      .filter(|&n: &u64| n > 0)
      .unwrap_or(1);

    let rate_limit_burst = env::var("RATE_LIMIT_BURST")
      .ok()
      .and_then(|v| v.parse().ok())
      .filter(|&n: &u32| n > 0)
      .unwrap_or(5);

    Ok(Self {
      database_url,
      admin_key,
      license_prefix,
      license_length,
      port,
      rate_limit_per_second,
      rate_limit_burst,
    })
  }
}
