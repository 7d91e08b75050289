//! Track and playlist types.

use serde::{Deserialize, Serialize};

/// A resolved, playable track.
///
/// Immutable once resolved. Identity is the provider-assigned `id`; two
/// tracks with the same `id` from different providers are distinct entities
/// (no dedup guarantee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Provider-assigned identifier.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Optional artwork image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    /// Direct playable audio URL.
    pub audio_url: String,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

/// An ordered track sequence with a current position.
///
/// Owned exclusively by the playback controller. Replaced wholesale on each
/// new resolution; the index wraps modulo length on advance/step-back and is
/// clamped to 0 when the playlist is empty.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current_index: usize,
}

impl Playlist {
    /// Create an empty playlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a playlist positioned at the first track.
    #[must_use]
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            current_index: 0,
        }
    }

    /// Replace the whole playlist and reset the position to 0.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current_index = 0;
    }

    /// Append one track to the end.
    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove all tracks and reset the position.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current_index = 0;
    }

    /// The track at the current position, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// The current position. Always a valid index while the playlist is
    /// non-empty; 0 when empty.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Advance to the next track, wrapping modulo length. Returns the new
    /// current track. No-op on an empty playlist.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.tracks.len();
        self.current()
    }

    /// Step back to the previous track, wrapping modulo length. Returns the
    /// new current track. No-op on an empty playlist.
    pub fn step_back(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + self.tracks.len() - 1) % self.tracks.len();
        self.current()
    }

    /// All tracks in order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// `true` when the playlist holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
