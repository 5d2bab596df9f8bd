use crate::handlers;
use crate::state::AppState;
use axum::{Router, http::HeaderValue, routing::get};
use shared::config::Config;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Storefront trends
        .route("/api/trends", get(handlers::get_trends))
        // Insight routes
        .route("/api/insights/trending", get(handlers::insights_trending))
        .route("/api/insights/interest", get(handlers::interest_over_time))
        .route("/api/insights/related", get(handlers::related))
        .route("/api/insights/regions", get(handlers::interest_by_region))
        // Middleware
        .layer(cors_layer(config))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
}
