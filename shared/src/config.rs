use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub default_geo: String,
    pub default_category: String,
    pub trends_base_url: String,
    pub trends_cache_ttl_secs: u64,
    pub daily_trends_limit: usize,
    pub realtime_trends_limit: usize,
    pub courtesy_delay_ms: u64,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_GEO: &str = "AU";
    const DEFAULT_CATEGORY: &str = "b";
    const DEFAULT_TRENDS_BASE_URL: &str = "https://trends.google.com";
    const DEFAULT_CACHE_TTL_SECS: u64 = 300;
    const DEFAULT_DAILY_LIMIT: usize = 6;
    const DEFAULT_REALTIME_LIMIT: usize = 4;
    const DEFAULT_COURTESY_DELAY_MS: u64 = 1000;

    pub fn from_env() -> Self {
        let host = std::env::var("VIBE_HOST").unwrap_or_else(|_| "localhost".to_string());
        let http_port = std::env::var("VIBE_HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .unwrap_or(8080);
        let trends_cache_ttl_secs = std::env::var("VIBE_TRENDS_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let daily_trends_limit = std::env::var("VIBE_DAILY_TRENDS_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(Self::DEFAULT_DAILY_LIMIT);
        let realtime_trends_limit = std::env::var("VIBE_REALTIME_TRENDS_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(Self::DEFAULT_REALTIME_LIMIT);
        let courtesy_delay_ms = std::env::var("VIBE_COURTESY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_COURTESY_DELAY_MS);
        Self {
            host,
            http_port,
            default_geo: std::env::var("VIBE_DEFAULT_GEO")
                .unwrap_or_else(|_| Self::DEFAULT_GEO.to_string()),
            default_category: std::env::var("VIBE_DEFAULT_CATEGORY")
                .unwrap_or_else(|_| Self::DEFAULT_CATEGORY.to_string()),
            trends_base_url: std::env::var("VIBE_TRENDS_BASE_URL").unwrap_or_else(|_| {
                warn!(
                    "VIBE_TRENDS_BASE_URL not set, using {}",
                    Self::DEFAULT_TRENDS_BASE_URL
                );
                Self::DEFAULT_TRENDS_BASE_URL.to_string()
            }),
            trends_cache_ttl_secs,
            daily_trends_limit,
            realtime_trends_limit,
            courtesy_delay_ms,
            allowed_origins: std::env::var("VIBE_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        }
    }
}
