//! Top-level chat orchestration.
//!
//! [`ChatOrchestrator`] receives each user message, classifies it, and drives
//! either the playback path (music resolution + playback controller + a
//! synthesized acknowledgement) or the completion path (completion pipeline +
//! model reply). Music-intent turns are never sent to the completion
//! pipeline.
//!
//! The orchestrator `&mut`-owns all session state, so messages are processed
//! strictly in submission order and conversation appends can never
//! interleave.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::intent::{ChatIntent, classify};
use crate::llm::CompletionPipeline;
use crate::mode::{Mode, ModeRegistry};
use crate::music::TrackResolver;
use crate::playback::{DeviceEvent, MediaPlaybackDevice, PlaybackController, TransportState};
use crate::session::{ConversationMessage, ImagePayload, SessionState};
use crate::sink::UserInterfaceSink;

/// Coordinates intent routing, music resolution, playback, and completion
/// for one chat session.
pub struct ChatOrchestrator<D: MediaPlaybackDevice> {
    session: SessionState,
    modes: ModeRegistry,
    resolver: Arc<dyn TrackResolver>,
    playback: PlaybackController<D>,
    pipeline: CompletionPipeline,
    sink: Arc<dyn UserInterfaceSink>,
}

impl<D: MediaPlaybackDevice> ChatOrchestrator<D> {
    /// Assemble an orchestrator from its collaborators.
    pub fn new(
        resolver: Arc<dyn TrackResolver>,
        playback: PlaybackController<D>,
        pipeline: CompletionPipeline,
        sink: Arc<dyn UserInterfaceSink>,
    ) -> Self {
        Self {
            session: SessionState::new(),
            modes: ModeRegistry::new(),
            resolver,
            playback,
            pipeline,
            sink,
        }
    }

    /// The conversation log.
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The playback controller.
    #[must_use]
    pub fn playback(&self) -> &PlaybackController<D> {
        &self.playback
    }

    /// The current conversational mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Switch conversational mode. Affects subsequent completion requests
    /// only; an in-flight request keeps the profile captured at call time.
    pub fn set_mode(&mut self, mode: Mode) {
        self.modes.set_mode(mode);
    }

    /// Forward a device notification to the playback state machine.
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        self.playback.handle_event(event);
    }

    /// Drain every queued device event into the playback state machine
    /// without blocking. Called on the session task between user messages.
    pub fn drain_device_events(&mut self, events: &mut mpsc::Receiver<DeviceEvent>) {
        while let Ok(event) = events.try_recv() {
            self.playback.handle_event(event);
        }
    }

    /// Consume device events until the channel closes (every sender
    /// dropped). Runs on the session task; see
    /// [`device_event_channel`](crate::playback::device_event_channel) for
    /// the sender half.
    pub async fn run_device_events(&mut self, mut events: mpsc::Receiver<DeviceEvent>) {
        while let Some(event) = events.recv().await {
            self.playback.handle_event(event);
        }
        debug!("device event channel closed");
    }

    /// Handle one inbound user message, mutating conversation and playback
    /// state. Playback-command turns get a synthesized acknowledgement;
    /// everything else goes through the completion pipeline.
    pub async fn handle_user_message(&mut self, text: &str, image: Option<ImagePayload>) {
        let intent = classify(text);
        debug!(intent = ?intent, "classified user message");

        match intent {
            ChatIntent::Play { query } => {
                self.append_user(text, image);
                self.handle_play(&query).await;
            }
            ChatIntent::Pause => {
                self.append_user(text, image);
                let ack = match self.playback.state() {
                    TransportState::Playing => {
                        "Paused the music. Just say the word when you want it back on."
                    }
                    TransportState::Paused => "The music's already paused.",
                    _ => "There's no music playing right now.",
                };
                self.playback.pause();
                self.append_companion(ack);
            }
            ChatIntent::Next => {
                self.append_user(text, image);
                self.playback.next();
                let ack = match self.playback.current_track() {
                    Some(track) => format!("Skipping ahead to {} by {}.", track.title, track.artist),
                    None => "There's nothing queued up right now.".to_owned(),
                };
                self.append_companion(ack);
            }
            ChatIntent::Previous => {
                self.append_user(text, image);
                self.playback.previous();
                let ack = match self.playback.current_track() {
                    Some(track) => format!("Going back to {} by {}.", track.title, track.artist),
                    None => "There's nothing queued up right now.".to_owned(),
                };
                self.append_companion(ack);
            }
            ChatIntent::None => {
                self.handle_chat(text, image).await;
            }
        }
    }

    async fn handle_play(&mut self, query: &str) {
        info!(query, "resolving music request");
        let tracks = self.resolver.resolve(query).await;

        if tracks.is_empty() {
            // Exhausted resolution is a chat-level apology, never an error.
            self.append_companion(
                "I couldn't find anything to play for that, sorry! Want to try a different song?",
            );
            return;
        }

        let first = &tracks[0];
        let ack = format!("Now playing {} by {} 🎶", first.title, first.artist);
        self.playback.play_playlist(tracks);
        self.append_companion(ack);
    }

    async fn handle_chat(&mut self, text: &str, image: Option<ImagePayload>) {
        // Snapshot the history before appending the current turn; the
        // pipeline appends the current user turn to the request itself.
        let history = self.session.messages().to_vec();
        let profile = self.modes.current_profile();

        self.append_user(text, image.clone());

        let reply = self
            .pipeline
            .complete(text, &history, profile, image.as_ref())
            .await;
        self.append_companion(reply);
    }

    fn append_user(&mut self, text: &str, image: Option<ImagePayload>) {
        let message = match image {
            Some(payload) => ConversationMessage::user_with_image(text, payload),
            None => ConversationMessage::user(text),
        };
        self.sink.message_appended(&message);
        self.session.push(message);
    }

    fn append_companion(&mut self, text: impl Into<String>) {
        let message = ConversationMessage::companion(text);
        self.sink.message_appended(&message);
        self.session.push(message);
    }
}
