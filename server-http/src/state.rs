use memo_cache::MemoCache;
use shared::TtlSeconds;
use shared::config::Config;
use std::convert::Infallible;
use std::sync::Arc;
use trends::TrendsService;
use trends::domain::{TrendItem, TrendsQuery};

/// Server state shared across handlers. Constructed once at startup and
/// injected, so every instance (and every test) gets its own cache.
#[derive(Clone)]
pub struct AppState {
    pub trends: Arc<TrendsService>,
    pub trends_cache: Arc<MemoCache<Vec<TrendItem>>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(trends: Arc<TrendsService>, config: Arc<Config>) -> Self {
        Self {
            trends,
            trends_cache: Arc::new(MemoCache::new()),
            config,
        }
    }

    /// Trending lookup memoized under the query's deterministic key, so
    /// repeated requests inside the TTL window skip the upstream call.
    pub async fn trending_cached(&self, query: &TrendsQuery) -> Vec<TrendItem> {
        let ttl = TtlSeconds(self.config.trends_cache_ttl_secs);
        let result: Result<Vec<TrendItem>, Infallible> = self
            .trends_cache
            .get_or_compute(&query.cache_key(), ttl, || async {
                Ok(self.trends.trending(query).await)
            })
            .await;
        match result {
            Ok(items) => items,
            Err(never) => match never {},
        }
    }
}
