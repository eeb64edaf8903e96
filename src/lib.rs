//! License management backend.
//!
//! Issues, verifies, and administers license keys bound to hardware
//! fingerprints, with optional Telegram/Discord identity linkage.
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Axum for the HTTP API with per-IP rate limiting
//! - Tokio for the async runtime

pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod model;
pub mod prelude;
pub mod router;
pub mod state;
pub mod sv;
pub mod utils;
