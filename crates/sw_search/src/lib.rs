use serde::Deserialize;
use tracing::info;
use url::Url;

use sw_core::{Error, Result, SearchResult};

pub mod assemble;

pub use assemble::{assemble, merge_fetched};

/// Upstream engines requested from the aggregator on every query.
const ENGINES: &[&str] = &["google", "bing", "yahoo", "duckduckgo", "qwant"];

/// URL extensions that never yield usable page text.
const SKIPPED_EXTENSIONS: &[&str] = &["xlsx", "pdf"];

/// Results scored at or below this are dropped.
const MIN_SCORE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Aggregator endpoint, SearXNG JSON API compatible.
    pub endpoint: String,
    /// Maximum number of raw results considered per query.
    pub result_num: usize,
    /// Hosts filtered out of every result set.
    pub denied_hosts: Vec<String>,
    /// The aggregator deployment sits behind a self-signed certificate.
    pub danger_accept_invalid_certs: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://searxng.sevnday.top".to_string(),
            result_num: 5,
            denied_hosts: vec!["bbc".to_string()],
            danger_accept_invalid_certs: true,
        }
    }
}

/// Decoded aggregator payload. Only the fields the pipeline reads.
#[derive(Debug, Deserialize)]
pub struct RawResponse {
    pub results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

pub struct SearchClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()?;
        Ok(Self { client, config })
    }

    /// One GET against the aggregator. Transport and decode failures are
    /// both `Error::Search`; no retry.
    pub async fn query(&self, question: &str) -> Result<RawResponse> {
        let params = [
            ("q", question.to_string()),
            ("format", "json".to_string()),
            ("pageno", "1".to_string()),
            ("engines", ENGINES.join(",")),
        ];
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Search(format!("aggregator request failed: {}", e)))?;
        response
            .json::<RawResponse>()
            .await
            .map_err(|e| Error::Search(format!("malformed aggregator response: {}", e)))
    }

    /// Query the aggregator and return the filtered result set.
    pub async fn search(&self, question: &str) -> Result<Vec<SearchResult>> {
        let raw = self.query(question).await?;
        let results = filter_results(raw, self.config.result_num, &self.config.denied_hosts);
        for result in &results {
            info!("🔎 {:.2} {} ({})", result.score, result.title, result.url);
        }
        Ok(results)
    }
}

/// Filter a decoded aggregator payload down to usable results: take the
/// top `limit`, then drop skipped extensions, denied hosts and low
/// scores. Pure: identical payloads always yield identical result sets.
pub fn filter_results(
    raw: RawResponse,
    limit: usize,
    denied_hosts: &[String],
) -> Vec<SearchResult> {
    raw.results
        .into_iter()
        .take(limit)
        .filter(|r| !has_skipped_extension(&r.url))
        .filter(|r| !is_denied_host(&r.url, denied_hosts))
        .filter(|r| r.score > MIN_SCORE)
        .map(|r| SearchResult {
            title: r.title,
            url: r.url,
            score: r.score,
            snippet: r.content,
        })
        .collect()
}

fn has_skipped_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('.').next() {
        Some(ext) => SKIPPED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)),
        None => false,
    }
}

fn is_denied_host(url: &str, denied: &[String]) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| denied.iter().any(|d| host.contains(d.as_str())))
            .unwrap_or(false),
        Err(_) => false,
    }
}
