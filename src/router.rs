//! Route table and middleware stack

use std::sync::Arc;

use axum::{
  Router,
  middleware::from_fn_with_state,
  routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  timeout::TimeoutLayer,
  trace::TraceLayer,
};

use crate::{handlers, middleware, prelude::*, state::AppState};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn router(state: Arc<AppState>) -> Router {
  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(state.config.rate_limit_per_second)
      .burst_size(state.config.rate_limit_burst)
      .finish()
      .expect("failed to build rate limiter config"),
  );

  // The limiter keys on peer IP; evict idle entries so the map stays
  // bounded over the process lifetime.
  let limiter = governor_conf.limiter().clone();
  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      limiter.retain_recent();
    }
  });

  let public = Router::new()
    .route("/ping", get(handlers::ping))
    .route("/license/verify", post(handlers::license::verify))
    .layer(GovernorLayer::new(governor_conf));

  let admin = Router::new()
    .route("/user/create", post(handlers::user::create_user))
    .route("/user", get(handlers::user::get_user))
    .route(
      "/user/{user_id}/device",
      post(handlers::user::add_device).delete(handlers::user::remove_device),
    )
    .route(
      "/user/{user_id}/devices/reset",
      post(handlers::user::reset_devices),
    )
    .route(
      "/user/{user_id}/license/status",
      post(handlers::user::change_license_status),
    )
    .route(
      "/user/{user_id}/license/hwid_limit",
      post(handlers::user::update_hwid_limit),
    )
    .route(
      "/user/{user_id}/license/renew",
      post(handlers::user::renew_license),
    )
    .route("/user/{user_id}/discord", post(handlers::user::bind_discord))
    .route("/user/{user_id}/telegram", post(handlers::user::bind_telegram))
    .route("/user/{user_id}", delete(handlers::user::delete_user))
    .route_layer(from_fn_with_state(state.clone(), middleware::admin_auth));

  Router::new()
    .nest("/api", public.merge(admin))
    .layer(
      ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::x_request_id()),
    )
    .with_state(state)
}
