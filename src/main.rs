//! Countdown Timer - A tick-driven countdown engine with an HTTP control surface
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s",
          config.host, config.port, config.duration);

    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.duration));
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start            - Start or resume the countdown");
    info!("  POST /pause            - Pause the countdown");
    info!("  POST /stop             - Stop and reset the countdown");
    info!("  POST /increase?step=N  - Add seconds");
    info!("  POST /decrease?step=N  - Remove seconds");
    info!("  GET  /status           - Current timer and display hints");
    info!("  GET  /events           - Server-sent timer updates");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for shutdown signals: {}", e),
            }
        }
    }

    state.engine.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
