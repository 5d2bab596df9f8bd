use crate::models::{TrendsParams, TrendsResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::info;
use trends::domain::{TrendMode, TrendsQuery};

/// GET /api/trends
///
/// Aggregated storefront trends. Total apart from input validation: each
/// requested mode resolves through the memo cache and degrades to fallback
/// data instead of failing.
pub async fn get_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Result<Json<TrendsResponse>, StatusCode> {
    let geo = params
        .geo
        .unwrap_or_else(|| state.config.default_geo.clone());
    let category = params
        .category
        .unwrap_or_else(|| state.config.default_category.clone());
    let mode = params.mode.as_deref().unwrap_or("both");

    info!("GET trends: geo={}, mode={}, category={}", geo, mode, category);

    let modes: Vec<TrendMode> = match mode {
        "both" => vec![TrendMode::Daily, TrendMode::Realtime],
        other => vec![other.parse().map_err(|_| StatusCode::BAD_REQUEST)?],
    };

    let mut response = TrendsResponse {
        daily_trends: Vec::new(),
        realtime_trends: Vec::new(),
    };
    for mode in modes {
        let query = TrendsQuery::new(geo.clone(), mode, category.clone());
        let items = state.trending_cached(&query).await;
        match mode {
            TrendMode::Daily => response.daily_trends = items,
            TrendMode::Realtime => response.realtime_trends = items,
        }
    }

    Ok(Json(response))
}
