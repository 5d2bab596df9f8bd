use crate::domain::Resolution;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::Result;

// Ports are the pluggable extension points for upstream data sources

/// Port for the upstream trends data source.
///
/// Implementations return the raw response body; classification and
/// normalization happen in the service layer, so a body may be JSON or an
/// HTML block page.
#[async_trait]
pub trait TrendsProvider: Send + Sync + 'static {
    async fn daily_trends(&self, geo: &str) -> Result<String>;

    async fn realtime_trends(&self, geo: &str, category: &str) -> Result<String>;

    async fn interest_over_time(
        &self,
        term: &str,
        geo: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String>;

    async fn related_queries(&self, term: &str, geo: &str) -> Result<String>;

    async fn related_topics(&self, term: &str, geo: &str) -> Result<String>;

    async fn interest_by_region(
        &self,
        term: &str,
        geo: &str,
        resolution: Resolution,
    ) -> Result<String>;
}
