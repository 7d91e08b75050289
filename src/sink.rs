//! UI collaborator interface.
//!
//! The core pushes conversation and playback changes to a
//! [`UserInterfaceSink`] fire-and-forget; nothing in the core waits on the
//! sink. The host app implements this to drive rendering.

use crate::music::Playlist;
use crate::playback::TransportState;
use crate::session::ConversationMessage;

/// Receives state changes from the orchestration core for rendering.
pub trait UserInterfaceSink: Send + Sync {
    /// A message was appended to the conversation log.
    fn message_appended(&self, message: &ConversationMessage);

    /// The playback transport state changed.
    fn transport_changed(&self, state: TransportState);

    /// The playlist was replaced or repositioned.
    fn playlist_changed(&self, playlist: &Playlist);
}

/// A sink that ignores everything. Useful for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UserInterfaceSink for NullSink {
    fn message_appended(&self, _message: &ConversationMessage) {}
    fn transport_changed(&self, _state: TransportState) {}
    fn playlist_changed(&self, _playlist: &Playlist) {}
}
