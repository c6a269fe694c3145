//! Spreadsheet-backed knowledge source
//!
//! Reads a Google Sheets range through the values API. The first row holds
//! field names. Responses are cached for a configurable TTL.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Url;
use serde::Deserialize;
use std::time::{Duration, Instant};

use support_agent_config::constants::{cache, endpoints, timeouts};
use support_agent_config::KnowledgeConfig;
use support_agent_core::{Error, KnowledgeSnapshot, KnowledgeSource, Result};

/// Sheets source configuration
#[derive(Debug, Clone)]
pub struct SheetsSourceConfig {
    /// Values API base, without trailing slash
    pub base_url: String,
    pub sheet_id: String,
    pub api_key: String,
    /// A1 range or sheet name
    pub range: String,
    /// How long a fetched table is reused
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl Default for SheetsSourceConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::SHEETS_API.to_string(),
            sheet_id: String::new(),
            api_key: String::new(),
            range: endpoints::SHEETS_DEFAULT_RANGE.to_string(),
            cache_ttl: Duration::from_secs(cache::KNOWLEDGE_TTL_SECS),
            timeout: Duration::from_millis(timeouts::KNOWLEDGE_FETCH_MS),
        }
    }
}

impl From<&KnowledgeConfig> for SheetsSourceConfig {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            sheet_id: config.sheet_id.clone(),
            api_key: config.api_key.clone(),
            range: config.range.clone(),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            timeout: Duration::from_millis(config.fetch_timeout_ms),
            ..Default::default()
        }
    }
}

struct CachedSnapshot {
    snapshot: KnowledgeSnapshot,
    fetched_at: Instant,
}

/// Values API response body
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct SheetsSource {
    config: SheetsSourceConfig,
    client: reqwest::Client,
    cache: RwLock<Option<CachedSnapshot>>,
}

impl SheetsSource {
    pub fn new(config: SheetsSourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::KnowledgeSource(format!("http client: {}", e)))?;

        Ok(Self {
            config,
            client,
            cache: RwLock::new(None),
        })
    }

    /// Drop the cached table so the next fetch goes to the API
    pub fn clear_cache(&self) {
        *self.cache.write() = None;
        tracing::debug!("Sheets cache cleared");
    }

    /// `{base}/{sheet_id}/values/{range}?key={api_key}`, path segments encoded
    fn values_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| Error::KnowledgeSource(format!("invalid sheets url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::KnowledgeSource("sheets url cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                self.config.sheet_id.as_str(),
                "values",
                self.config.range.as_str(),
            ]);
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    fn cached(&self) -> Option<KnowledgeSnapshot> {
        let guard = self.cache.read();
        guard
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|c| c.snapshot.clone())
    }
}

/// Turn a values API body into a snapshot
fn parse_values(body: &str) -> Result<KnowledgeSnapshot> {
    let range: ValueRange = serde_json::from_str(body)
        .map_err(|e| Error::KnowledgeSource(format!("unexpected sheets response: {}", e)))?;
    KnowledgeSnapshot::from_table(&range.values)
        .ok_or_else(|| Error::KnowledgeSource("sheet has no header row".into()))
}

#[async_trait]
impl KnowledgeSource for SheetsSource {
    async fn fetch(&self) -> Result<KnowledgeSnapshot> {
        if let Some(snapshot) = self.cached() {
            tracing::debug!(entries = snapshot.len(), "Using cached sheet");
            return Ok(snapshot);
        }

        let url = self.values_url()?;
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.config.timeout.as_millis() as u64)
            } else {
                Error::KnowledgeSource(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::KnowledgeSource(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::KnowledgeSource(format!(
                "sheets HTTP {}",
                status.as_u16()
            )));
        }

        let snapshot = parse_values(&body)?;
        *self.cache.write() = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });
        tracing::info!(
            entries = snapshot.len(),
            sheet = %self.config.sheet_id,
            "Fetched knowledge sheet"
        );
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "sheets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use support_agent_core::KnowledgeEntry;

    fn source(range: &str) -> SheetsSource {
        SheetsSource::new(SheetsSourceConfig {
            sheet_id: "abc123".into(),
            api_key: "k3y".into(),
            range: range.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_values_url() {
        let url = source("Sheet1").values_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1?key=k3y"
        );
    }

    #[test]
    fn test_values_url_encodes_range() {
        let url = source("FAQ Sheet!A1:B20").values_url().unwrap();
        assert!(url.path().ends_with("/values/FAQ%20Sheet!A1:B20"));
    }

    #[test]
    fn test_parse_values() {
        let body = r#"{
            "range": "Sheet1!A1:B3",
            "majorDimension": "ROWS",
            "values": [["Question", "Answer"], ["What are your hours?", "9am-5pm"], ["Do you deliver?"]]
        }"#;
        let snapshot = parse_values(body).unwrap();
        assert_eq!(snapshot.headers, vec!["Question", "Answer"]);
        assert_eq!(snapshot.rows[0].get("Answer"), Some("9am-5pm"));
        assert_eq!(snapshot.rows[1].get("Answer"), Some(""));
    }

    #[test]
    fn test_parse_empty_sheet() {
        assert!(matches!(
            parse_values(r#"{"range": "Sheet1"}"#),
            Err(Error::KnowledgeSource(_))
        ));
        assert!(parse_values("<html>").is_err());
    }

    #[tokio::test]
    async fn test_fresh_cache_is_served_and_clearable() {
        let source = source("Sheet1");
        let snapshot = KnowledgeSnapshot::new(
            vec!["Question".into()],
            vec![KnowledgeEntry::new().with("Question", "cached")],
        );
        *source.cache.write() = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            fetched_at: Instant::now(),
        });

        assert_eq!(source.fetch().await.unwrap(), snapshot);
        source.clear_cache();
        assert!(source.cached().is_none());
    }

    #[test]
    fn test_expired_cache_is_ignored() {
        let source = SheetsSource::new(SheetsSourceConfig {
            cache_ttl: Duration::ZERO,
            ..Default::default()
        })
        .unwrap();
        *source.cache.write() = Some(CachedSnapshot {
            snapshot: KnowledgeSnapshot::new(vec![], vec![]),
            fetched_at: Instant::now(),
        });
        assert!(source.cached().is_none());
    }
}
