pub mod health;
pub mod insights;
pub mod trends;

pub use health::health_check;
pub use insights::{insights_trending, interest_by_region, interest_over_time, related};
pub use self::trends::get_trends;
