//! Genius API search client and lyric page fetcher

use super::{ClientError, PageFetcher, SearchBatch, SearchProvider};
use async_trait::async_trait;
use lyra_common::SearchHit;
use serde_json::Value;
use std::time::Duration;

/// Host serving the lyric pages that search hits point at
pub const LYRICS_HOST: &str = "genius.com";

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Genius search client
pub struct GeniusClient {
    http_client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GeniusClient {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

/// Split a `/search` response body into per-hit results
fn parse_search_response(body: &Value) -> Result<SearchBatch, ClientError> {
    let hits = body
        .pointer("/response/hits")
        .and_then(Value::as_array)
        .ok_or(ClientError::MissingField("response.hits"))?;

    Ok(hits.iter().map(parse_hit).collect())
}

fn parse_hit(hit: &Value) -> Result<SearchHit, ClientError> {
    let result = hit.get("result").ok_or(ClientError::MissingField("result"))?;
    let display_title = result
        .get("full_title")
        .and_then(Value::as_str)
        .ok_or(ClientError::MissingField("result.full_title"))?;
    let url = result
        .get("url")
        .and_then(Value::as_str)
        .ok_or(ClientError::MissingField("result.url"))?;

    Ok(SearchHit {
        display_title: display_title.to_string(),
        url: url.to_string(),
    })
}

#[async_trait]
impl SearchProvider for GeniusClient {
    async fn search(&self, query: &str) -> Result<SearchBatch, ClientError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ClientError::NotConfigured("genius_token"))?;

        let url = format!("{}/search", self.api_base);
        tracing::debug!(query = %query, "Querying Genius search");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        parse_search_response(&body)
    }
}

/// True for an http(s) URL on [`LYRICS_HOST`] or one of its subdomains
pub fn is_lyrics_page(url: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed.host_str().is_some_and(|host| {
        host == LYRICS_HOST
            || host
                .strip_suffix(LYRICS_HOST)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Plain HTTP fetcher for lyric pages
pub struct LyricsPageClient {
    http_client: reqwest::Client,
}

impl LyricsPageClient {
    pub fn new() -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(PAGE_USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl PageFetcher for LyricsPageClient {
    async fn fetch_html(&self, url: &str) -> Result<String, ClientError> {
        tracing::debug!(url = %url, "Fetching lyrics page");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api(status.as_u16(), format!("GET {}", url)));
        }

        Ok(response.text().await?)
    }
}
