//! Offline sample catalog — the last stage of the resolution chain.
//!
//! A deterministic genre classifier maps a query's lowercase text to one of
//! a fixed set of genre buckets by substring containment (first match wins,
//! [`DEFAULT_BUCKET`] when nothing matches). Each bucket carries exactly
//! three canned tracks, combined with a rotating pool of sample audio URLs
//! so playback always has something to play with zero network connectivity.
//!
//! This stage cannot fail: every query maps to a bucket and every bucket is
//! non-empty.

use super::track::Track;

/// A canned track tuple within a genre bucket.
#[derive(Debug)]
pub struct SampleTrack {
    /// Track title.
    pub title: &'static str,
    /// Artist name.
    pub artist: &'static str,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

/// One genre bucket of the offline sample catalog.
#[derive(Debug)]
pub struct GenreBucket {
    /// Bucket name, used in synthesized track IDs.
    pub genre: &'static str,
    /// Keywords matched against the query by substring containment.
    pub keywords: &'static [&'static str],
    /// The bucket's three canned tracks.
    pub tracks: [SampleTrack; 3],
}

/// Rotating pool of always-reachable sample audio URLs. Track `i` of a
/// resolved bucket plays `SAMPLE_AUDIO_URLS[i % len]`.
pub const SAMPLE_AUDIO_URLS: &[&str] = &[
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3",
];

/// Genre buckets, checked in order; first keyword match wins.
pub const GENRE_BUCKETS: &[GenreBucket] = &[
    GenreBucket {
        genre: "lofi",
        keywords: &["lofi", "lo-fi", "lo fi", "chillhop"],
        tracks: [
            SampleTrack {
                title: "Midnight Study Session",
                artist: "Cloud District",
                duration_seconds: 172.0,
            },
            SampleTrack {
                title: "Rainy Window",
                artist: "Tape Hiss Collective",
                duration_seconds: 198.0,
            },
            SampleTrack {
                title: "Coffee Shop Corner",
                artist: "Slow Motion Club",
                duration_seconds: 154.0,
            },
        ],
    },
    GenreBucket {
        genre: "jazz",
        keywords: &["jazz", "swing", "saxophone", "bebop"],
        tracks: [
            SampleTrack {
                title: "Blue Hour",
                artist: "The Midnight Quartet",
                duration_seconds: 243.0,
            },
            SampleTrack {
                title: "Brushes on Snare",
                artist: "Ella Marlowe Trio",
                duration_seconds: 201.0,
            },
            SampleTrack {
                title: "Smoky Room",
                artist: "Count Vernon",
                duration_seconds: 226.0,
            },
        ],
    },
    GenreBucket {
        genre: "classical",
        keywords: &["classical", "piano", "orchestra", "symphony", "violin"],
        tracks: [
            SampleTrack {
                title: "Nocturne in Soft Light",
                artist: "Mira Kovacs",
                duration_seconds: 312.0,
            },
            SampleTrack {
                title: "String Quartet No. 3",
                artist: "Aurora Chamber Ensemble",
                duration_seconds: 287.0,
            },
            SampleTrack {
                title: "Morning Prelude",
                artist: "Jonas Lindqvist",
                duration_seconds: 195.0,
            },
        ],
    },
    GenreBucket {
        genre: "rock",
        keywords: &["rock", "guitar", "metal", "punk"],
        tracks: [
            SampleTrack {
                title: "Static Horizon",
                artist: "The Voltage Kids",
                duration_seconds: 214.0,
            },
            SampleTrack {
                title: "Gravel Road",
                artist: "Iron Harvest",
                duration_seconds: 189.0,
            },
            SampleTrack {
                title: "Neon Riot",
                artist: "Fever Machine",
                duration_seconds: 232.0,
            },
        ],
    },
    GenreBucket {
        genre: "electronic",
        keywords: &["electronic", "edm", "techno", "house", "synth", "dance"],
        tracks: [
            SampleTrack {
                title: "Circuit Bloom",
                artist: "Nova Tape",
                duration_seconds: 248.0,
            },
            SampleTrack {
                title: "Afterglow Drive",
                artist: "Pixel Mirage",
                duration_seconds: 221.0,
            },
            SampleTrack {
                title: "Low Orbit",
                artist: "Analog Weather",
                duration_seconds: 264.0,
            },
        ],
    },
    GenreBucket {
        genre: "ambient",
        keywords: &["ambient", "sleep", "calm", "relax", "meditation", "rain"],
        tracks: [
            SampleTrack {
                title: "Slow Tide",
                artist: "Field & Stream",
                duration_seconds: 341.0,
            },
            SampleTrack {
                title: "Night Air",
                artist: "Hollow Pines",
                duration_seconds: 296.0,
            },
            SampleTrack {
                title: "Drifting",
                artist: "Soft Geometry",
                duration_seconds: 318.0,
            },
        ],
    },
];

/// Bucket used when no genre keyword matches (including the empty "play
/// something generic" query).
pub const DEFAULT_BUCKET: &GenreBucket = &GenreBucket {
    genre: "pop",
    keywords: &[],
    tracks: [
        SampleTrack {
            title: "Golden Hour Drive",
            artist: "June Avenue",
            duration_seconds: 207.0,
        },
        SampleTrack {
            title: "Paper Hearts",
            artist: "Stella Reyes",
            duration_seconds: 193.0,
        },
        SampleTrack {
            title: "Weekend Glow",
            artist: "The Bright Side",
            duration_seconds: 218.0,
        },
    ],
};

/// Map a query to its genre bucket. First bucket with a matching keyword
/// wins; [`DEFAULT_BUCKET`] when none match.
#[must_use]
pub fn classify_genre(query: &str) -> &'static GenreBucket {
    let lowered = query.to_lowercase();
    GENRE_BUCKETS
        .iter()
        .find(|bucket| bucket.keywords.iter().any(|k| lowered.contains(k)))
        .unwrap_or(DEFAULT_BUCKET)
}

/// Produce the three playable sample tracks for a query.
///
/// Total: always returns exactly three tracks, for any input.
#[must_use]
pub fn sample_tracks(query: &str) -> Vec<Track> {
    let bucket = classify_genre(query);
    bucket
        .tracks
        .iter()
        .enumerate()
        .map(|(i, sample)| Track {
            id: format!("sample-{}-{i}", bucket.genre),
            title: sample.title.to_owned(),
            artist: sample.artist.to_owned(),
            artwork_url: None,
            audio_url: SAMPLE_AUDIO_URLS[i % SAMPLE_AUDIO_URLS.len()].to_owned(),
            duration_seconds: sample.duration_seconds,
        })
        .collect()
}
