use crate::domain::{
    GeoRow, RelatedKind, RelatedRow, RelatedValue, SeriesPoint, TrendItem,
};
use chrono::DateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::{Error, Result};

/// Substituted when the upstream omits a display metric.
const MISSING_METRIC: &str = "N/A";

/// Classify a raw upstream body. A body starting with `<` is the HTML
/// challenge page the feed serves when it rate-limits; anything else must
/// parse as JSON.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let trimmed = body.trim();
    if trimmed.starts_with('<') {
        return Err(Error::BlockPage);
    }
    serde_json::from_str(trimmed).map_err(|e| Error::Malformed(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct DailyEnvelope {
    #[serde(default)]
    default: DailyDefault,
}

#[derive(Debug, Default, Deserialize)]
struct DailyDefault {
    #[serde(rename = "trendingSearchesDays", default)]
    trending_searches_days: Vec<TrendingDay>,
}

#[derive(Debug, Deserialize)]
struct TrendingDay {
    #[serde(rename = "trendingSearches", default)]
    trending_searches: Vec<RawTrendingSearch>,
}

#[derive(Debug, Deserialize)]
struct RawTrendingSearch {
    title: RawTitle,
    #[serde(rename = "formattedTraffic")]
    formatted_traffic: Option<String>,
}

/// The feed has shipped both a bare string and a `{ query }` wrapper here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTitle {
    Plain(String),
    Nested { query: String },
}

impl RawTitle {
    fn into_text(self) -> String {
        match self {
            RawTitle::Plain(text) => text,
            RawTitle::Nested { query } => query,
        }
    }
}

/// Flatten a daily-trends payload into at most `limit` items from the first
/// day bucket. Later days are ignored.
pub fn normalize_daily(body: &str, limit: usize) -> Result<Vec<TrendItem>> {
    let envelope: DailyEnvelope = parse_body(body)?;
    let items = envelope
        .default
        .trending_searches_days
        .into_iter()
        .next()
        .map(|day| day.trending_searches)
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .map(|raw| TrendItem {
            title: raw.title.into_text(),
            metric: Some(
                raw.formatted_traffic
                    .unwrap_or_else(|| MISSING_METRIC.to_string()),
            ),
            tags: Vec::new(),
        })
        .collect();
    Ok(items)
}

#[derive(Debug, Deserialize)]
struct RealtimeEnvelope {
    #[serde(rename = "storySummaries", default)]
    story_summaries: StorySummaries,
}

#[derive(Debug, Default, Deserialize)]
struct StorySummaries {
    #[serde(rename = "trendingStories", default)]
    trending_stories: Vec<RawStory>,
}

#[derive(Debug, Deserialize)]
struct RawStory {
    title: String,
    #[serde(rename = "entityNames", default)]
    entity_names: Vec<String>,
}

/// Flatten a realtime-trends payload into at most `limit` story items.
pub fn normalize_realtime(body: &str, limit: usize) -> Result<Vec<TrendItem>> {
    let envelope: RealtimeEnvelope = parse_body(body)?;
    let items = envelope
        .story_summaries
        .trending_stories
        .into_iter()
        .take(limit)
        .map(|raw| TrendItem {
            title: raw.title,
            metric: None,
            tags: raw.entity_names,
        })
        .collect();
    Ok(items)
}

#[derive(Debug, Deserialize)]
struct TimelineEnvelope {
    #[serde(default)]
    default: TimelineDefault,
}

#[derive(Debug, Default, Deserialize)]
struct TimelineDefault {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<RawTimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct RawTimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<u64>,
}

/// Interest series points, timestamps converted from unix seconds to
/// RFC 3339. A missing value defaults to 0.
pub fn normalize_timeline(body: &str) -> Result<Vec<SeriesPoint>> {
    let envelope: TimelineEnvelope = parse_body(body)?;
    Ok(envelope
        .default
        .timeline_data
        .into_iter()
        .map(|point| {
            let secs = point.time.parse::<i64>().unwrap_or(0);
            SeriesPoint {
                t: DateTime::from_timestamp(secs, 0)
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default(),
                v: point.value.first().copied().unwrap_or(0),
            }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct RankedEnvelope {
    #[serde(default)]
    default: RankedDefault,
}

#[derive(Debug, Default, Deserialize)]
struct RankedDefault {
    #[serde(rename = "rankedList", default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Default, Deserialize)]
struct RankedList {
    #[serde(rename = "rankedKeyword", default)]
    ranked_keyword: Vec<RawRankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RawRankedKeyword {
    query: Option<String>,
    topic: Option<RawTopic>,
    value: Option<RelatedValue>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    title: String,
}

/// Ranked related rows: list 0 carries TOP entries, list 1 RISING ones.
/// Rows naming neither a query nor a topic are dropped.
pub fn normalize_ranked(body: &str) -> Result<Vec<RelatedRow>> {
    let envelope: RankedEnvelope = parse_body(body)?;
    let mut rows = Vec::new();
    for (index, list) in envelope.default.ranked_list.into_iter().take(2).enumerate() {
        let kind = if index == 0 {
            RelatedKind::Top
        } else {
            RelatedKind::Rising
        };
        for raw in list.ranked_keyword {
            let Some(term) = raw.query.or(raw.topic.map(|t| t.title)) else {
                continue;
            };
            rows.push(RelatedRow {
                term,
                kind,
                value: raw.value.unwrap_or(RelatedValue::Number(0)),
                link: raw.link,
            });
        }
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct GeoEnvelope {
    #[serde(default)]
    default: GeoDefault,
}

#[derive(Debug, Default, Deserialize)]
struct GeoDefault {
    #[serde(rename = "geoMapData", default)]
    geo_map_data: Vec<RawGeoRow>,
}

#[derive(Debug, Deserialize)]
struct RawGeoRow {
    #[serde(rename = "geoName")]
    geo_name: String,
    #[serde(default)]
    value: Vec<u64>,
}

pub fn normalize_geo(body: &str) -> Result<Vec<GeoRow>> {
    let envelope: GeoEnvelope = parse_body(body)?;
    Ok(envelope
        .default
        .geo_map_data
        .into_iter()
        .map(|row| GeoRow {
            geo: row.geo_name,
            value: row.value.first().copied().unwrap_or(0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY_BODY: &str = r#"{
        "default": {
            "trendingSearchesDays": [
                {
                    "trendingSearches": [
                        { "title": { "query": "X" }, "formattedTraffic": "1M+" },
                        { "title": { "query": "Y" } },
                        { "title": "Z", "formattedTraffic": "200K+" }
                    ]
                },
                {
                    "trendingSearches": [
                        { "title": { "query": "yesterday" }, "formattedTraffic": "5M+" }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_normalize_daily_flattens_and_substitutes_missing_traffic() {
        let items = normalize_daily(DAILY_BODY, 6).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "X");
        assert_eq!(items[0].metric.as_deref(), Some("1M+"));
        assert!(items[0].tags.is_empty());
        assert_eq!(items[1].title, "Y");
        assert_eq!(items[1].metric.as_deref(), Some("N/A"));
        // Bare-string titles parse too.
        assert_eq!(items[2].title, "Z");
    }

    #[test]
    fn test_normalize_daily_reads_only_the_first_day_bucket() {
        let items = normalize_daily(DAILY_BODY, 6).unwrap();
        assert!(items.iter().all(|item| item.title != "yesterday"));
    }

    #[test]
    fn test_normalize_daily_bounds_the_result() {
        let items = normalize_daily(DAILY_BODY, 2).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_normalize_daily_tolerates_missing_wrapper() {
        assert!(normalize_daily("{}", 6).unwrap().is_empty());
        assert!(
            normalize_daily(r#"{"default":{"trendingSearchesDays":[]}}"#, 6)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_normalize_realtime_carries_entity_tags() {
        let body = r#"{
            "storySummaries": {
                "trendingStories": [
                    { "title": "Gaming chairs", "entityNames": ["Gaming", "Furniture"] },
                    { "title": "Coffee subscriptions" },
                    { "title": "Desk setups", "entityNames": [] },
                    { "title": "Packaging", "entityNames": ["Business"] },
                    { "title": "Fifth story", "entityNames": ["Extra"] }
                ]
            }
        }"#;
        let items = normalize_realtime(body, 4).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, "Gaming chairs");
        assert_eq!(items[0].tags, vec!["Gaming", "Furniture"]);
        assert_eq!(items[0].metric, None);
        assert!(items[1].tags.is_empty());
    }

    #[test]
    fn test_block_page_is_classified_not_parsed() {
        let err = normalize_daily("<html>blocked</html>", 6).unwrap_err();
        assert!(matches!(err, Error::BlockPage));
        let err = normalize_realtime("  <!DOCTYPE html><html></html>", 4).unwrap_err();
        assert!(matches!(err, Error::BlockPage));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = normalize_daily("definitely not json", 6).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_normalize_timeline() {
        let body = r#"{
            "default": {
                "timelineData": [
                    { "time": "1700000000", "value": [42] },
                    { "time": "1700604800", "value": [] }
                ]
            }
        }"#;
        let points = normalize_timeline(body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].v, 42);
        assert!(points[0].t.starts_with("2023-11-14T"));
        assert_eq!(points[1].v, 0);
    }

    #[test]
    fn test_normalize_ranked_splits_top_and_rising() {
        let body = r#"{
            "default": {
                "rankedList": [
                    { "rankedKeyword": [
                        { "query": "standing desk", "value": 100, "link": "/trends/x" }
                    ] },
                    { "rankedKeyword": [
                        { "topic": { "title": "Ergonomics" }, "value": "Breakout" },
                        { "value": 5 }
                    ] }
                ]
            }
        }"#;
        let rows = normalize_ranked(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].term, "standing desk");
        assert_eq!(rows[0].kind, RelatedKind::Top);
        assert_eq!(rows[0].value, RelatedValue::Number(100));
        assert_eq!(rows[0].link.as_deref(), Some("/trends/x"));
        assert_eq!(rows[1].term, "Ergonomics");
        assert_eq!(rows[1].kind, RelatedKind::Rising);
        assert_eq!(rows[1].value, RelatedValue::Text("Breakout".to_string()));
    }

    #[test]
    fn test_normalize_geo() {
        let body = r#"{
            "default": {
                "geoMapData": [
                    { "geoName": "New South Wales", "value": [100] },
                    { "geoName": "Victoria", "value": [] }
                ]
            }
        }"#;
        let rows = normalize_geo(body).unwrap();
        assert_eq!(rows[0].geo, "New South Wales");
        assert_eq!(rows[0].value, 100);
        assert_eq!(rows[1].value, 0);
    }
}
