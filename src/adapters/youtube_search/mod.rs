//! YouTube Data API v3 search adapter
//!
//! Implements [`SearchPort`] with two endpoints: `search` for discovery and
//! `videos` for the licence and duration of a single candidate.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::time::DurationParser;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 300;

/// YouTube-backed search adapter
pub struct YoutubeSearchAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    license_filter: String,
}

impl YoutubeSearchAdapter {
    /// Create new adapter against the production API
    pub fn new(api_key: String, license_filter: String) -> Self {
        Self::with_base_url(api_key, license_filter, DEFAULT_BASE_URL.to_string())
    }

    /// Create new adapter against a custom API root
    pub fn with_base_url(api_key: String, license_filter: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            license_filter,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::RemoteFail(format!("{} request failed: {}", endpoint, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::RemoteFail(format!(
                "{} returned HTTP {}: {}",
                endpoint,
                status.as_u16(),
                truncate(&body, MAX_ERROR_BODY)
            )));
        }

        resp.json::<T>().await.map_err(|e| {
            DomainError::InvalidResponse(format!("{} response could not be decoded: {}", endpoint, e))
        })
    }
}

#[async_trait]
impl SearchPort for YoutubeSearchAdapter {
    async fn search(&self, term: &str, max_results: u32) -> Result<Vec<SearchHit>, DomainError> {
        let max_results = max_results.to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("videoLicense", self.license_filter.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("q", term),
                ],
            )
            .await?;

        let hits: Vec<SearchHit> = response
            .items
            .into_iter()
            .filter_map(SearchItem::into_hit)
            .collect();
        debug!(term, count = hits.len(), "Search returned candidates");
        Ok(hits)
    }

    async fn fetch_details(&self, source_id: &str) -> Result<Option<VideoDetails>, DomainError> {
        let response: VideosResponse = self
            .get_json(
                "videos",
                &[("part", "contentDetails,snippet,status"), ("id", source_id)],
            )
            .await?;

        Ok(response.items.into_iter().next().map(|item| {
            let duration = item
                .content_details
                .and_then(|details| details.duration)
                .unwrap_or_else(|| "PT0S".to_string());
            let license = item
                .status
                .and_then(|status| status.license)
                .unwrap_or_default();

            VideoDetails::new(
                source_id,
                license,
                DurationParser::parse_or_zero(&duration),
            )
        }))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

impl SearchItem {
    /// Channel and playlist results carry no video id and are dropped
    fn into_hit(self) -> Option<SearchHit> {
        let source_id = self.id.video_id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet.unwrap_or_default();
        let thumbnail_url = snippet
            .thumbnails
            .get("high")
            .or_else(|| snippet.thumbnails.get("default"))
            .map(|thumb| thumb.url.clone())
            .filter(|url| !url.is_empty());

        Some(SearchHit {
            source_id,
            title: unescape_html(&snippet.title),
            author_name: unescape_html(&snippet.channel_title),
            thumbnail_url,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: Option<ContentDetails>,
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    license: Option<String>,
}

/// Longest `&...;` sequence considered a character reference
const MAX_ENTITY_LEN: usize = 12;

/// Snippet text comes HTML-escaped from the search endpoint.
///
/// Decodes in a single pass, so `&amp;lt;` becomes `&lt;`. Unknown entities
/// are kept as written.
fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Named entities the endpoint emits, plus decimal and hex references
fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
