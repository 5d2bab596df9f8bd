// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("upstream returned a block page")]
    BlockPage,
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Entry validity duration with second granularity. Unsigned, so negative
/// TTLs are unrepresentable; zero means "immediately stale".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlSeconds(pub u64);

impl TtlSeconds {
    pub fn as_millis(self) -> u64 {
        self.0 * 1000
    }
}

pub mod config;
