//! Muse: conversational orchestration core for an AI-companion chat app.
//!
//! Each inbound user message flows through one pipeline:
//! message → intent router → {playback path | completion path} → conversation log
//!
//! # Architecture
//!
//! - **Intent router** ([`intent`]): keyword rules classifying a message as a
//!   playback command or ordinary chat
//! - **Music resolution** ([`music`]): ordered provider chain — remote
//!   extraction, catalog search, offline samples — that always ends playable
//! - **Playback** ([`playback`]): transport state machine driving the
//!   platform media device through an explicit event channel
//! - **Modes** ([`mode`]): per-mode prompt, model, token budget, temperature
//! - **Completion** ([`llm`]): bounded-history chat completion with a
//!   deterministic local responder on provider failure
//! - **Orchestrator** ([`orchestrator`]): ties the above to one session's
//!   conversation log
//!
//! The UI, onboarding, auth, and speech layers of the host app are external
//! collaborators consumed through the traits in [`sink`], [`music::client`],
//! [`playback::device`], and [`llm::client`].

pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod mode;
pub mod music;
pub mod orchestrator;
pub mod playback;
pub mod session;
pub mod sink;

pub use config::MuseConfig;
pub use error::{MuseError, Result};
pub use intent::{ChatIntent, classify};
pub use llm::CompletionPipeline;
pub use mode::{Mode, ModeProfile, ModeRegistry};
pub use music::{MusicResolver, Playlist, Track, TrackResolver};
pub use orchestrator::ChatOrchestrator;
pub use playback::{
    DeviceEvent, DeviceEventSender, MediaPlaybackDevice, PlaybackController, TransportState,
    device_event_channel,
};
pub use session::{ConversationMessage, ImagePayload, SessionState};
pub use sink::{NullSink, UserInterfaceSink};

/// Initialize tracing with an env-filter, defaulting to `muse=info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("muse=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
