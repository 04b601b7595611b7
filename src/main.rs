use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use veritext::gateway::{self, AppState};
use veritext::{Analyzer, Config, ResultCache, ServiceContext};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// How often the cache sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        cache_dir = %config.cache_dir.display(),
        port = config.port,
        "Starting veritext"
    );

    let context = Arc::new(
        ServiceContext::initialize(&config).context("failed to initialize service context")?,
    );
    let cache = Arc::new(
        ResultCache::new(&config.cache_dir, config.cache_ttl_secs)
            .context("failed to open result cache")?,
    );

    spawn_cache_sweeper(Arc::clone(&cache), config.cache_retention_days);

    let analyzer = Analyzer::new(Arc::clone(&context), cache, config.thresholds);
    let app = gateway::router(AppState { analyzer, context });

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Periodically deletes cache files past the retention window.
fn spawn_cache_sweeper(cache: Arc<ResultCache>, retention_days: i64) {
    let retention = chrono::Duration::days(retention_days);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let cache = Arc::clone(&cache);
            if let Err(e) = tokio::task::spawn_blocking(move || cache.sweep(retention)).await {
                warn!(error = %e, "Cache sweep task failed");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install shutdown handler");
    }
    info!("Shutdown signal received");
}
