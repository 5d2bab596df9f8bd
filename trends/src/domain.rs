use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which trending feed to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMode {
    Daily,
    Realtime,
}

impl fmt::Display for TrendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendMode::Daily => write!(f, "daily"),
            TrendMode::Realtime => write!(f, "realtime"),
        }
    }
}

impl FromStr for TrendMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(TrendMode::Daily),
            "realtime" => Ok(TrendMode::Realtime),
            _ => Err("unknown trend mode"),
        }
    }
}

/// A trending topic flattened out of the provider's wrapper objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Functional input for a trending lookup; doubles as the cache key source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendsQuery {
    pub geo: String,
    pub mode: TrendMode,
    pub category: String,
}

impl TrendsQuery {
    pub fn new(geo: impl Into<String>, mode: TrendMode, category: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            mode,
            category: category.into(),
        }
    }

    /// Colon-joined key in fixed field order: identical queries always
    /// collide, distinct queries never do.
    pub fn cache_key(&self) -> String {
        format!("trends:{}:{}:{}", self.geo, self.mode, self.category)
    }
}

/// Bounds applied while normalizing provider payloads.
#[derive(Clone, Copy, Debug)]
pub struct TrendLimits {
    pub daily: usize,
    pub realtime: usize,
}

impl Default for TrendLimits {
    fn default() -> Self {
        Self {
            daily: 6,
            realtime: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub t: String,
    pub v: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestSeries {
    pub term: String,
    pub series: Vec<SeriesPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelatedKind {
    Top,
    Rising,
}

/// Popularity value attached to a related row. The upstream sends a number
/// for most rows and a label like "Breakout" for fast risers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedValue {
    Number(u64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedRow {
    pub term: String,
    pub kind: RelatedKind,
    pub value: RelatedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedData {
    pub queries: Vec<RelatedRow>,
    pub topics: Vec<RelatedRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRow {
    pub geo: String,
    pub value: u64,
}

/// Granularity of a regional interest breakdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    Country,
    #[default]
    Region,
    City,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Country => write!(f, "COUNTRY"),
            Resolution::Region => write!(f, "REGION"),
            Resolution::City => write!(f, "CITY"),
        }
    }
}

impl FromStr for Resolution {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COUNTRY" => Ok(Resolution::Country),
            "REGION" => Ok(Resolution::Region),
            "CITY" => Ok(Resolution::City),
            _ => Err("unknown resolution"),
        }
    }
}
