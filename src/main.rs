//! Config Registry - Binary Entry Point
//!
//! Serves the registry over HTTP until Ctrl-C or SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config_registry::api::create_router;
use config_registry::{ConfigRegistry, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "config_registry=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        version = config_registry::VERSION,
        bind_address = %settings.bind_address,
        default_environment = %settings.default_environment,
        subscriber_buffer = settings.subscriber_buffer,
        "Configuration loaded"
    );

    let registry = Arc::new(ConfigRegistry::with_settings(settings.clone()));
    let app = create_router(registry.clone());

    let listener = TcpListener::bind(&settings.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, then close live streams so connections can drain
async fn shutdown_signal(registry: Arc<ConfigRegistry>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    registry.shutdown();
}
