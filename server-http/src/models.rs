use serde::{Deserialize, Serialize};
use trends::domain::{GeoRow, InterestSeries, TrendItem};

// === Request Parameters ===

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    pub geo: Option<String>,
    pub mode: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterestParams {
    pub terms: String,
    pub geo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
    pub term: String,
    pub geo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionParams {
    pub term: String,
    pub geo: Option<String>,
    pub resolution: Option<String>,
}

// === Response Models ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct TrendsResponse {
    pub daily_trends: Vec<TrendItem>,
    pub realtime_trends: Vec<TrendItem>,
}

#[derive(Serialize)]
pub struct InterestResponse {
    pub series: Vec<InterestSeries>,
}

#[derive(Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<GeoRow>,
}
