use crate::domain::Resolution;
use crate::normalize::parse_body;
use crate::ports::TrendsProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use shared::{Error, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

const DAILY_PATH: &str = "/trends/api/dailytrends";
const REALTIME_PATH: &str = "/trends/api/realtimetrends";
const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const RELATED_PATH: &str = "/trends/api/widgetdata/relatedsearches";
const COMPARED_GEO_PATH: &str = "/trends/api/widgetdata/comparedgeo";

const HL: &str = "en-US";

/// Google prefixes JSON payloads with an XSSI guard; strip it so downstream
/// classification sees either JSON or a bare HTML block page.
fn strip_xssi_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    match trimmed.strip_prefix(")]}'") {
        Some(rest) => rest.trim_start_matches(|c| c == ',' || c == '\n' || c == '\r'),
        None => trimmed,
    }
}

/// Widget descriptor handed out by the explore endpoint. The token and the
/// echoed request authorize one widget-data call.
#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    token: String,
    request: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

/// Google Trends adapter for [`TrendsProvider`].
///
/// Each trending call sleeps a fixed courtesy delay before the request; the
/// feed rate-limits aggressively and answers with an HTML challenge page
/// when it does.
pub struct GoogleTrendsClient {
    client: Client,
    base_url: String,
    courtesy_delay: Duration,
}

impl GoogleTrendsClient {
    pub fn new(base_url: impl Into<String>, courtesy_delay: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            courtesy_delay,
        }
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting trends endpoint");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("{path} returned {status}")));
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;
        Ok(strip_xssi_prefix(&body).to_string())
    }

    /// Resolve the widget token the explore endpoint hands out for a term.
    async fn widget(
        &self,
        term: &str,
        geo: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        widget_id: &str,
    ) -> Result<ExploreWidget> {
        let req = json!({
            "comparisonItem": [{
                "keyword": term,
                "geo": geo,
                "time": format!("{} {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
            }],
            "category": 0,
            "property": "",
        });
        let body = self
            .get_text(
                EXPLORE_PATH,
                &[
                    ("hl", HL.to_string()),
                    ("tz", "0".to_string()),
                    ("req", req.to_string()),
                ],
            )
            .await?;
        let explore: ExploreResponse = parse_body(&body)?;
        explore
            .widgets
            .into_iter()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| Error::Malformed(format!("explore response missing {widget_id} widget")))
    }

    async fn widget_data(&self, path: &str, widget: ExploreWidget) -> Result<String> {
        self.get_text(
            path,
            &[
                ("hl", HL.to_string()),
                ("tz", "0".to_string()),
                ("req", widget.request.to_string()),
                ("token", widget.token),
            ],
        )
        .await
    }

    fn default_window() -> (DateTime<Utc>, DateTime<Utc>) {
        let end = Utc::now();
        (end - chrono::Duration::days(90), end)
    }
}

#[async_trait]
impl TrendsProvider for GoogleTrendsClient {
    async fn daily_trends(&self, geo: &str) -> Result<String> {
        sleep(self.courtesy_delay).await;
        let today = Utc::now().format("%Y%m%d").to_string();
        self.get_text(
            DAILY_PATH,
            &[
                ("hl", HL.to_string()),
                ("tz", "0".to_string()),
                ("geo", geo.to_string()),
                ("ns", "15".to_string()),
                ("ed", today),
            ],
        )
        .await
    }

    async fn realtime_trends(&self, geo: &str, category: &str) -> Result<String> {
        sleep(self.courtesy_delay).await;
        self.get_text(
            REALTIME_PATH,
            &[
                ("hl", HL.to_string()),
                ("tz", "0".to_string()),
                ("geo", geo.to_string()),
                ("cat", category.to_string()),
                ("fi", "0".to_string()),
                ("fs", "0".to_string()),
                ("ri", "300".to_string()),
                ("rs", "20".to_string()),
                ("sort", "0".to_string()),
            ],
        )
        .await
    }

    async fn interest_over_time(
        &self,
        term: &str,
        geo: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String> {
        let widget = self.widget(term, geo, start, end, "TIMESERIES").await?;
        self.widget_data(MULTILINE_PATH, widget).await
    }

    async fn related_queries(&self, term: &str, geo: &str) -> Result<String> {
        let (start, end) = Self::default_window();
        let widget = self.widget(term, geo, start, end, "RELATED_QUERIES").await?;
        self.widget_data(RELATED_PATH, widget).await
    }

    async fn related_topics(&self, term: &str, geo: &str) -> Result<String> {
        let (start, end) = Self::default_window();
        let widget = self.widget(term, geo, start, end, "RELATED_TOPICS").await?;
        self.widget_data(RELATED_PATH, widget).await
    }

    async fn interest_by_region(
        &self,
        term: &str,
        geo: &str,
        resolution: Resolution,
    ) -> Result<String> {
        let (start, end) = Self::default_window();
        let mut widget = self.widget(term, geo, start, end, "GEO_MAP").await?;
        if let Some(request) = widget.request.as_object_mut() {
            request.insert("resolution".to_string(), json!(resolution.to_string()));
        }
        self.widget_data(COMPARED_GEO_PATH, widget).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_xssi_prefix_removes_guard_and_separator() {
        assert_eq!(strip_xssi_prefix(")]}',\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_xssi_prefix(")]}'\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_xssi_prefix_leaves_plain_bodies_alone() {
        assert_eq!(strip_xssi_prefix("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_xssi_prefix("  <html>blocked</html>"), "<html>blocked</html>");
    }
}
