//! Ordered provider chain for music resolution.
//!
//! [`MusicResolver`] tries providers strictly in order — remote
//! extraction, catalog search, offline samples — stopping at the first
//! non-empty, playable track list. Provider errors are recorded as
//! [`ProviderAttempt`] values and logged, then execution falls through to
//! the next provider; the chain never propagates a provider error to the
//! caller. The offline sample stage is total, so [`MusicResolver`] never
//! resolves empty; another [`TrackResolver`] implementation may.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::client::{CatalogSearchClient, RemoteExtractionClient};
use super::samples;
use super::track::Track;

/// Turns a free-text query into a playable track list.
///
/// An empty result means "no result", never an error; callers surface it as
/// a chat-level apology.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a query into zero or more playable tracks.
    async fn resolve(&self, query: &str) -> Vec<Track>;
}

/// Outcome of a single provider attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The provider produced a playable, non-empty track list.
    Success(Vec<Track>),
    /// The provider answered but had nothing playable.
    Empty,
    /// The provider failed (transport, status, or decode).
    Error(String),
}

/// Record of one provider attempt, used for fallback sequencing and logging.
/// Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAttempt {
    /// Provider name (`extraction`, `catalog`, `samples`).
    pub provider: &'static str,
    /// The query that was attempted.
    pub query: String,
    /// What happened.
    pub outcome: AttemptOutcome,
}

/// Multi-provider music resolution engine.
pub struct MusicResolver {
    extraction: Option<Arc<dyn RemoteExtractionClient>>,
    catalog: Option<Arc<dyn CatalogSearchClient>>,
    catalog_limit: usize,
}

impl MusicResolver {
    /// Create a resolver with both remote providers configured.
    #[must_use]
    pub fn new(
        extraction: Arc<dyn RemoteExtractionClient>,
        catalog: Arc<dyn CatalogSearchClient>,
        catalog_limit: usize,
    ) -> Self {
        Self {
            extraction: Some(extraction),
            catalog: Some(catalog),
            catalog_limit,
        }
    }

    /// Create a resolver with no remote providers; every query resolves from
    /// the offline sample catalog.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            extraction: None,
            catalog: None,
            catalog_limit: 0,
        }
    }

    /// Create a resolver with only the extraction provider.
    #[must_use]
    pub fn with_extraction_only(extraction: Arc<dyn RemoteExtractionClient>) -> Self {
        Self {
            extraction: Some(extraction),
            catalog: None,
            catalog_limit: 0,
        }
    }

    /// Resolve a query, also returning the per-provider attempt log.
    pub async fn resolve_with_attempts(&self, query: &str) -> (Vec<Track>, Vec<ProviderAttempt>) {
        let mut attempts = Vec::new();

        if let Some(extraction) = &self.extraction {
            let attempt = self.try_extraction(extraction.as_ref(), query).await;
            log_attempt(&attempt);
            if let AttemptOutcome::Success(tracks) = &attempt.outcome {
                let tracks = tracks.clone();
                attempts.push(attempt);
                return (tracks, attempts);
            }
            attempts.push(attempt);
        }

        if let Some(catalog) = &self.catalog {
            let attempt = self.try_catalog(catalog.as_ref(), query).await;
            log_attempt(&attempt);
            if let AttemptOutcome::Success(tracks) = &attempt.outcome {
                let tracks = tracks.clone();
                attempts.push(attempt);
                return (tracks, attempts);
            }
            attempts.push(attempt);
        }

        // Offline samples are total: every query maps to a non-empty bucket.
        let tracks = samples::sample_tracks(query);
        let attempt = ProviderAttempt {
            provider: "samples",
            query: query.to_owned(),
            outcome: AttemptOutcome::Success(tracks.clone()),
        };
        log_attempt(&attempt);
        attempts.push(attempt);
        (tracks, attempts)
    }

    async fn try_extraction(
        &self,
        client: &dyn RemoteExtractionClient,
        query: &str,
    ) -> ProviderAttempt {
        let outcome = match client.search_and_extract(query).await {
            Ok(extracted) => match extracted.audio_url.as_deref() {
                Some(url) if !url.is_empty() => {
                    let track = Track {
                        id: extracted
                            .source_id
                            .unwrap_or_else(|| format!("extract-{}", uuid::Uuid::new_v4())),
                        title: extracted.title.unwrap_or_else(|| query.to_owned()),
                        artist: extracted.artist.unwrap_or_else(|| "Unknown Artist".to_owned()),
                        artwork_url: extracted.artwork_url,
                        audio_url: url.to_owned(),
                        duration_seconds: extracted.duration_seconds.unwrap_or(0.0),
                    };
                    AttemptOutcome::Success(vec![track])
                }
                // A match without a playable URL is a miss, not an error.
                _ => AttemptOutcome::Empty,
            },
            Err(e) => AttemptOutcome::Error(e.to_string()),
        };
        ProviderAttempt {
            provider: "extraction",
            query: query.to_owned(),
            outcome,
        }
    }

    async fn try_catalog(&self, client: &dyn CatalogSearchClient, query: &str) -> ProviderAttempt {
        let outcome = match client.search(query, self.catalog_limit).await {
            Ok(entries) => {
                let tracks: Vec<Track> = entries
                    .into_iter()
                    .filter_map(|entry| {
                        let preview = entry.preview_url?;
                        if preview.is_empty() {
                            return None;
                        }
                        Some(Track {
                            id: entry.id,
                            title: entry.title,
                            artist: entry.artist,
                            artwork_url: entry.artwork_url,
                            audio_url: preview,
                            duration_seconds: entry.duration_ms as f64 / 1000.0,
                        })
                    })
                    .take(self.catalog_limit)
                    .collect();
                if tracks.is_empty() {
                    AttemptOutcome::Empty
                } else {
                    AttemptOutcome::Success(tracks)
                }
            }
            Err(e) => AttemptOutcome::Error(e.to_string()),
        };
        ProviderAttempt {
            provider: "catalog",
            query: query.to_owned(),
            outcome,
        }
    }
}

#[async_trait]
impl TrackResolver for MusicResolver {
    /// The full provider chain; with the offline sample stage in place this
    /// never returns an empty list.
    async fn resolve(&self, query: &str) -> Vec<Track> {
        let (tracks, _) = self.resolve_with_attempts(query).await;
        tracks
    }
}

fn log_attempt(attempt: &ProviderAttempt) {
    match &attempt.outcome {
        AttemptOutcome::Success(tracks) => info!(
            provider = attempt.provider,
            query = attempt.query.as_str(),
            tracks = tracks.len(),
            "music provider resolved"
        ),
        AttemptOutcome::Empty => debug!(
            provider = attempt.provider,
            query = attempt.query.as_str(),
            "music provider returned nothing playable; falling through"
        ),
        AttemptOutcome::Error(reason) => warn!(
            provider = attempt.provider,
            query = attempt.query.as_str(),
            error = reason.as_str(),
            "music provider failed; falling through"
        ),
    }
}
