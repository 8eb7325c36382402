//! ZYNAVA Match Engine — Binary Entrypoint
//! Boots the Axum HTTP service: routes, shared state, reference tables,
//! Prometheus metrics.
//!
//! See `README.md` for quickstart.

use shuttle_axum::ShuttleAxum;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zynava_match_engine::api::{self, AppState};
use zynava_match_engine::metrics::Metrics;
use zynava_match_engine::reference::{
    start_hot_reload_thread, DEFAULT_REFERENCE_CONFIG_PATH, ENV_REFERENCE_CONFIG_PATH,
};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SCORING_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SCORING_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zscore=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // REFERENCE_CONFIG_PATH / REFERENCE_HOT_RELOAD from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // Reference tables + optional hot-reload watcher.
    let state = AppState::from_env();
    let path = std::env::var(ENV_REFERENCE_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REFERENCE_CONFIG_PATH));
    start_hot_reload_thread(state.reference.clone(), path);

    // Prometheus recorder + /metrics route.
    let metrics = Metrics::init(state.catalog.len());

    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
