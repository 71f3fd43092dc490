//! OpenWeather exporter
//!
//! Main entry point for the Prometheus exporter.

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, init_logging};
use presentation_http::{Cli, bootstrap, routes};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    init_logging(&config.logging)?;
    info!("openweather-exporter v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = config.validate()?;
    info!(
        listen_address = %settings.listen_address,
        locations = settings.locations.len(),
        pollution = settings.enable_pollution,
        uv = settings.enable_uv,
        "Configuration loaded"
    );

    let state = bootstrap::build_state(&settings).await?;

    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(settings.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_address))?;

    info!("Beginning to serve on http://{}/metrics", settings.listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
