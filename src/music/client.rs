//! Remote music provider clients.
//!
//! Two collaborator interfaces back the first two stages of the resolution
//! chain, both vendor-agnostic:
//!
//! - [`RemoteExtractionClient`] — posts a query to a search-and-extract
//!   endpoint and expects a single best match with a direct audio URL.
//! - [`CatalogSearchClient`] — keyword search against a licensed catalog,
//!   returning entries that may or may not carry a playable preview URL.
//!
//! The HTTP implementations use a shared per-client timeout and support base
//! URL override for mock-server tests.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{MuseError, Result};

/// Best-match result from the extraction endpoint.
///
/// All fields are optional on the wire; a missing or empty `audio_url` makes
/// the result unplayable and the resolver falls through to the next provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedTrack {
    /// Direct playable audio URL.
    pub audio_url: Option<String>,
    /// Track title.
    pub title: Option<String>,
    /// Artist name.
    pub artist: Option<String>,
    /// Artwork image URL.
    pub artwork_url: Option<String>,
    /// Duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Provider-side identifier.
    pub source_id: Option<String>,
}

/// One catalog search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Catalog identifier.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Playable preview URL; entries without one are filtered out.
    pub preview_url: Option<String>,
    /// Artwork image URL.
    #[serde(default)]
    pub artwork_url: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Search-and-extract collaborator.
#[async_trait]
pub trait RemoteExtractionClient: Send + Sync {
    /// Extract the single best playable match for a query.
    async fn search_and_extract(&self, query: &str) -> Result<ExtractedTrack>;
}

/// Catalog search collaborator.
#[async_trait]
pub trait CatalogSearchClient: Send + Sync {
    /// Keyword search, returning up to `limit` entries.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogEntry>>;
}

/// HTTP implementation of [`RemoteExtractionClient`].
#[derive(Debug, Clone)]
pub struct HttpExtractionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpExtractionClient {
    /// Create a client against the given base URL with the given per-attempt
    /// timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MuseError::Music(format!("extraction client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url.into()),
        })
    }
}

#[async_trait]
impl RemoteExtractionClient for HttpExtractionClient {
    async fn search_and_extract(&self, query: &str) -> Result<ExtractedTrack> {
        let url = format!("{}/v1/extract", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| MuseError::Music(format!("extraction request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MuseError::Music(format!(
                "extraction endpoint returned {status}"
            )));
        }

        response
            .json::<ExtractedTrack>()
            .await
            .map_err(|e| MuseError::Music(format!("extraction response decode failed: {e}")))
    }
}

/// HTTP implementation of [`CatalogSearchClient`].
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a client against the given base URL with the given per-attempt
    /// timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MuseError::Music(format!("catalog client build failed: {e}")))?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url.into()),
        })
    }
}

/// Wire shape of the catalog search response.
#[derive(Debug, Deserialize)]
struct CatalogSearchResponse {
    results: Vec<CatalogEntry>,
}

#[async_trait]
impl CatalogSearchClient for HttpCatalogClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/v1/search", self.base_url);
        let limit_param = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", limit_param.as_str())])
            .send()
            .await
            .map_err(|e| MuseError::Music(format!("catalog request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MuseError::Music(format!(
                "catalog endpoint returned {status}"
            )));
        }

        let body = response
            .json::<CatalogSearchResponse>()
            .await
            .map_err(|e| MuseError::Music(format!("catalog response decode failed: {e}")))?;
        Ok(body.results)
    }
}

fn normalize_base(base: String) -> String {
    base.trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            HttpExtractionClient::new("https://api.example/", Duration::from_secs(30)).unwrap();
        assert_eq!(client.base_url, "https://api.example");
    }

    #[test]
    fn extracted_track_decodes_partial_body() {
        let parsed: ExtractedTrack =
            serde_json::from_str(r#"{"audio_url":"https://a/x.mp3"}"#).unwrap();
        assert_eq!(parsed.audio_url.as_deref(), Some("https://a/x.mp3"));
        assert!(parsed.title.is_none());
    }

    #[test]
    fn catalog_entry_decodes_without_preview() {
        let parsed: CatalogEntry = serde_json::from_str(
            r#"{"id":"c1","title":"T","artist":"A","preview_url":null,"duration_ms":30000}"#,
        )
        .unwrap();
        assert!(parsed.preview_url.is_none());
        assert_eq!(parsed.duration_ms, 30000);
    }
}
