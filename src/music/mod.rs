//! Music resolution: provider clients, offline samples, and the ordered
//! fallback chain that turns a free-text query into a playable track list.

pub mod client;
pub mod resolver;
pub mod samples;
pub mod track;

pub use client::{
    CatalogEntry, CatalogSearchClient, ExtractedTrack, HttpCatalogClient, HttpExtractionClient,
    RemoteExtractionClient,
};
pub use resolver::{AttemptOutcome, MusicResolver, ProviderAttempt, TrackResolver};
pub use samples::{DEFAULT_BUCKET, GENRE_BUCKETS, SAMPLE_AUDIO_URLS, classify_genre, sample_tracks};
pub use track::{Playlist, Track};
