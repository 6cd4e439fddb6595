use anyhow::{Context, Result};
use clap::Parser;
use fan_dashboard::services::trace_refresh::TraceRefreshService;
use fan_dashboard::{charts, cli, config, db, routes, state};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind fan-dashboard listener on {addr}: port already in use. Stop the other service using this port or set FAN_DASHBOARD_HTTP_BIND to choose another address.",
            );
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to bind fan-dashboard listener on {addr}"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::Config::from_env(args.database)?;
    let store = db::Store::open(&config.database_path)?;
    let charts = Arc::new(charts::Charts::new(&config));

    let state = state::AppState {
        config: config.clone(),
        store,
        charts,
    };

    // The dashboard must have data before the listener comes up; a store
    // that cannot serve the first cycle is a startup failure.
    let refresh = TraceRefreshService::new(state.clone());
    refresh
        .refresh_once()
        .await
        .context("initial trace refresh failed")?;

    let cancel = CancellationToken::new();
    refresh.start(cancel.clone());

    let app = routes::router(state);
    let listener = bind_listener(&config.http_bind).await?;
    tracing::info!(
        bind = %config.http_bind,
        store = %config.database_path.display(),
        "fan-dashboard listening"
    );
    let http_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
        _ = http_handle => {}
    }
    cancel.cancel();

    Ok(())
}
