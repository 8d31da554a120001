use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::AppointmentState;
use call_cell::{CallLogWorker, CallState, VapiClient};
use shared_config::AppConfig;
use shared_database::{AirtableClient, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing before anything that may warn
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_LEVEL").ok(),
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Receptionist backend");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    let store: Arc<dyn RecordStore> =
        Arc::new(AirtableClient::new(&config).context("failed to build Airtable client")?);
    let relay = Arc::new(VapiClient::new(&config).context("failed to build Vapi client")?);

    // Call logs are written off the request path
    let (queue, worker) = CallLogWorker::spawn(Arc::clone(&store), config.logs_table.clone());

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(
        AppointmentState::new(Arc::clone(&config), store),
        CallState::new(relay, queue),
    )
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
            .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
    )
    .layer(cors);

    // Run the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    let report = worker.shutdown().await;
    info!(
        "Shutdown complete: {} call logs written, {} failed",
        report.written, report.failed
    );

    Ok(())
}

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` (default info) plus request tracing.
fn log_filter(rust_log: Option<String>, log_level: Option<String>) -> String {
    rust_log.unwrap_or_else(|| {
        format!(
            "{},tower_http=debug",
            log_level.as_deref().unwrap_or("info")
        )
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, finishing in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_prefers_rust_log() {
        assert_eq!(
            log_filter(Some("warn".to_string()), Some("debug".to_string())),
            "warn"
        );
    }

    #[test]
    fn test_log_filter_uses_log_level_without_config() {
        assert_eq!(
            log_filter(None, Some("debug".to_string())),
            "debug,tower_http=debug"
        );
        assert_eq!(log_filter(None, None), "info,tower_http=debug");
    }
}
