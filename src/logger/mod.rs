//! Logger module
//!
//! Thin façade over `tracing` so call sites read the same everywhere:
//! - server lifecycle logging
//! - access logging
//! - error, warning and debug messages

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless;
/// the second call reports an error that is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spa_static={level}")));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, root: &str, dynamic: bool) {
    tracing::info!("======================================");
    tracing::info!("SPA static server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving files from: {root}");
    tracing::info!("Entry document rendering: {}", if dynamic { "dynamic" } else { "static" });
    tracing::info!("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::error!("Failed to serve connection: {err}");
}

/// One line per answered request
pub fn log_access(peer: &SocketAddr, method: &str, path: &str, status: u16, elapsed_us: u128) {
    tracing::info!(
        target: "spa_static::access",
        %peer,
        method,
        path,
        status,
        elapsed_us = u64::try_from(elapsed_us).unwrap_or(u64::MAX),
        "{method} {path} {status}"
    );
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_debug(message: &str) {
    tracing::debug!("{message}");
}
