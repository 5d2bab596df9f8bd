pub mod domain;
pub mod fallback;
pub mod google;
pub mod normalize;
pub mod ports;
pub mod service;

// Re-export key types
pub use domain::{TrendItem, TrendLimits, TrendMode, TrendsQuery};
pub use google::GoogleTrendsClient;
pub use ports::TrendsProvider;
pub use service::TrendsService;
