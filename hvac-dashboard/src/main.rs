use std::sync::Arc;

use anyhow::{bail, Result};
use hvac_dashboard::{
    api::{self, AppState},
    cache::AnalyticsCache,
    config::AppConfig,
    metrics_server,
    observability,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing(observability::SERVER_DIRECTIVE);

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let dataset_path = cfg.dataset_path()?;
    let cache = AnalyticsCache::load(dataset_path, cfg.scenario_settings()).await?;
    if cache.dataset().is_empty() {
        bail!("dataset {} contains no readings", dataset_path.display());
    }

    // Scenarios are served from memory; compute them before accepting requests.
    let scenarios = cache.scenarios()?;
    tracing::info!(
        readings = cache.dataset().len(),
        window_minutes = cache.settings().early_shutoff_window.whole_minutes(),
        total_base_kwh = scenarios.total_base_kwh,
        "analytics cache ready"
    );

    let state = AppState {
        cache: Arc::new(cache),
        tariff: cfg.tariff(),
        scatter_max_points: cfg.server.scatter_max_points,
    };

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr.as_str())
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {e}", cfg.server.bind_addr))?;
    tracing::info!(addr = %cfg.server.bind_addr, "api listener started");

    axum::serve(listener, api::router(state).into_make_service()).await?;

    Ok(())
}
