use server_http::{AppState, build_router};
use shared::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use trends::domain::TrendLimits;
use trends::{GoogleTrendsClient, TrendsService};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting VibeStore trends server...");

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    // Load configuration from environment variables
    let config = Arc::new(Config::from_env());

    // Wire up the trends pipeline
    let provider = Arc::new(GoogleTrendsClient::new(
        config.trends_base_url.clone(),
        Duration::from_millis(config.courtesy_delay_ms),
    ));
    let limits = TrendLimits {
        daily: config.daily_trends_limit,
        realtime: config.realtime_trends_limit,
    };
    let trends = Arc::new(TrendsService::new(provider, limits));

    // Initialize state
    let state = AppState::new(trends, config.clone());

    // Build router
    let router = build_router(state, &config);

    // Start server
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("HTTP server listening on http://{}", addr);
    info!(
        "Try: curl 'http://localhost:{}/api/trends?geo={}&mode=both'",
        config.http_port, config.default_geo
    );

    // Graceful shutdown handler
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
