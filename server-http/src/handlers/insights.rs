use crate::models::{InterestParams, InterestResponse, RegionParams, RegionsResponse, RelatedParams, TrendsParams};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::info;
use trends::domain::{RelatedData, Resolution, TrendItem, TrendMode, TrendsQuery};

/// GET /api/insights/trending
pub async fn insights_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendsParams>,
) -> Result<Json<Vec<TrendItem>>, StatusCode> {
    let geo = params
        .geo
        .unwrap_or_else(|| state.config.default_geo.clone());
    let category = params
        .category
        .unwrap_or_else(|| state.config.default_category.clone());
    let mode: TrendMode = params
        .mode
        .as_deref()
        .unwrap_or("realtime")
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    info!("GET insights/trending: geo={}, mode={}, category={}", geo, mode, category);

    let query = TrendsQuery::new(geo, mode, category);
    Ok(Json(state.trending_cached(&query).await))
}

/// GET /api/insights/interest
pub async fn interest_over_time(
    State(state): State<AppState>,
    Query(params): Query<InterestParams>,
) -> Result<Json<InterestResponse>, StatusCode> {
    let terms: Vec<String> = params
        .terms
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let geo = params
        .geo
        .unwrap_or_else(|| state.config.default_geo.clone());

    info!("GET insights/interest: terms={}, geo={}", terms.len(), geo);

    let series = state.trends.interest_over_time(&terms, &geo).await;
    Ok(Json(InterestResponse { series }))
}

/// GET /api/insights/related
pub async fn related(
    State(state): State<AppState>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<RelatedData>, StatusCode> {
    let term = params.term.trim();
    if term.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let geo = params
        .geo
        .unwrap_or_else(|| state.config.default_geo.clone());

    info!("GET insights/related: term={}, geo={}", term, geo);

    Ok(Json(state.trends.related(term, &geo).await))
}

/// GET /api/insights/regions
pub async fn interest_by_region(
    State(state): State<AppState>,
    Query(params): Query<RegionParams>,
) -> Result<Json<RegionsResponse>, StatusCode> {
    let term = params.term.trim();
    if term.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let geo = params
        .geo
        .unwrap_or_else(|| state.config.default_geo.clone());
    let resolution: Resolution = match params.resolution.as_deref() {
        None => Resolution::default(),
        Some(raw) => raw.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
    };

    info!("GET insights/regions: term={}, geo={}, resolution={}", term, geo, resolution);

    let regions = state.trends.interest_by_region(term, &geo, resolution).await;
    Ok(Json(RegionsResponse { regions }))
}
