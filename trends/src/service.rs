use crate::domain::{
    GeoRow, InterestSeries, RelatedData, RelatedRow, Resolution, TrendItem, TrendLimits,
    TrendMode, TrendsQuery,
};
use crate::fallback;
use crate::normalize;
use crate::ports::TrendsProvider;
use chrono::Utc;
use shared::Result;
use std::sync::Arc;
use tracing::warn;

/// Interest queries look back this many days.
const LOOKBACK_DAYS: i64 = 90;
/// At most this many terms are resolved per interest query.
const MAX_INTEREST_TERMS: usize = 5;

/// Orchestrates the upstream provider, normalization, and fallback.
pub struct TrendsService {
    provider: Arc<dyn TrendsProvider>,
    limits: TrendLimits,
}

impl TrendsService {
    pub fn new(provider: Arc<dyn TrendsProvider>, limits: TrendLimits) -> Self {
        Self { provider, limits }
    }

    /// Fetch and normalize trending topics for a query.
    ///
    /// Total: every failure class (network error, HTML block page, parse
    /// failure, empty payload) collapses into the fixed fallback list for
    /// the mode, with the distinguishing reason logged before the collapse.
    pub async fn trending(&self, query: &TrendsQuery) -> Vec<TrendItem> {
        match self.try_trending(query).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => {
                warn!(
                    geo = %query.geo,
                    mode = %query.mode,
                    "upstream returned no usable trends, serving fallback"
                );
                fallback::for_mode(query.mode)
            }
            Err(err) => {
                warn!(
                    geo = %query.geo,
                    mode = %query.mode,
                    error = %err,
                    "trends fetch failed, serving fallback"
                );
                fallback::for_mode(query.mode)
            }
        }
    }

    async fn try_trending(&self, query: &TrendsQuery) -> Result<Vec<TrendItem>> {
        match query.mode {
            TrendMode::Daily => {
                let body = self.provider.daily_trends(&query.geo).await?;
                normalize::normalize_daily(&body, self.limits.daily)
            }
            TrendMode::Realtime => {
                let body = self
                    .provider
                    .realtime_trends(&query.geo, &query.category)
                    .await?;
                normalize::normalize_realtime(&body, self.limits.realtime)
            }
        }
    }

    /// Interest-over-time series for up to five terms, fetched concurrently.
    /// A failing term collapses to an empty series.
    pub async fn interest_over_time(&self, terms: &[String], geo: &str) -> Vec<InterestSeries> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(LOOKBACK_DAYS);
        let lookups = terms.iter().take(MAX_INTEREST_TERMS).map(|term| async move {
            let series = match self
                .provider
                .interest_over_time(term, geo, start, end)
                .await
                .and_then(|body| normalize::normalize_timeline(&body))
            {
                Ok(points) => points,
                Err(err) => {
                    warn!(term = %term, error = %err, "interest query failed, returning empty series");
                    Vec::new()
                }
            };
            InterestSeries {
                term: term.clone(),
                series,
            }
        });
        futures::future::join_all(lookups).await
    }

    /// Related queries and topics for a term. Either leg failing yields an
    /// empty list for that leg.
    pub async fn related(&self, term: &str, geo: &str) -> RelatedData {
        let (queries_body, topics_body) = tokio::join!(
            self.provider.related_queries(term, geo),
            self.provider.related_topics(term, geo),
        );
        RelatedData {
            queries: Self::ranked_or_empty(queries_body, term, "related queries"),
            topics: Self::ranked_or_empty(topics_body, term, "related topics"),
        }
    }

    fn ranked_or_empty(body: Result<String>, term: &str, what: &str) -> Vec<RelatedRow> {
        match body.and_then(|b| normalize::normalize_ranked(&b)) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(term, error = %err, "{what} lookup failed, returning empty list");
                Vec::new()
            }
        }
    }

    /// Regional interest breakdown for a term. Failure yields an empty list.
    pub async fn interest_by_region(
        &self,
        term: &str,
        geo: &str,
        resolution: Resolution,
    ) -> Vec<GeoRow> {
        match self
            .provider
            .interest_by_region(term, geo, resolution)
            .await
            .and_then(|body| normalize::normalize_geo(&body))
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!(term, error = %err, "regional interest lookup failed, returning empty list");
                Vec::new()
            }
        }
    }
}
