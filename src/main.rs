use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use license_api::config::Config;
use license_api::prelude::*;
use license_api::router::router;
use license_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "license_api=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  info!("starting license server v{}", env!("CARGO_PKG_VERSION"));

  let state = Arc::new(AppState::new(config).await?);
  let app = router(state.clone());

  let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
  let listener =
    tokio::net::TcpListener::bind(addr).await.context("failed to bind")?;
  info!("HTTP server listening on {addr}");

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .context("axum server error")?;

  Ok(())
}
