//! Media playback device collaborator.
//!
//! The device is the platform's media engine (AVPlayer, ExoPlayer, ...). The
//! core drives it through [`MediaPlaybackDevice`] and receives notifications
//! back as [`DeviceEvent`] values on an explicit channel, so ordering and
//! stale-event rejection are contracts rather than incidental callback
//! timing.
//!
//! Every `load` carries a generation number allocated by the playback
//! controller; the device stamps all subsequent events with it. Events whose
//! generation no longer matches the controller's current one belong to a
//! track the user has already moved past and are dropped.

use tokio::sync::mpsc;

use crate::error::{MuseError, Result};

/// Buffer size of the device event channel. Progress ticks are the densest
/// traffic at roughly one per second, so a small buffer is plenty.
pub const DEVICE_EVENT_CAPACITY: usize = 64;

/// Create the device event channel: the sender half goes to the platform
/// device, the receiver half is consumed on the session task (see
/// [`ChatOrchestrator::drain_device_events`] and
/// [`ChatOrchestrator::run_device_events`]).
///
/// [`ChatOrchestrator::drain_device_events`]: crate::ChatOrchestrator::drain_device_events
/// [`ChatOrchestrator::run_device_events`]: crate::ChatOrchestrator::run_device_events
#[must_use]
pub fn device_event_channel() -> (DeviceEventSender, mpsc::Receiver<DeviceEvent>) {
    let (tx, rx) = mpsc::channel(DEVICE_EVENT_CAPACITY);
    (DeviceEventSender { tx }, rx)
}

/// Handle the platform device uses to emit [`DeviceEvent`]s.
///
/// Sending never blocks, so it is safe to call from device callback threads.
#[derive(Debug, Clone)]
pub struct DeviceEventSender {
    tx: mpsc::Sender<DeviceEvent>,
}

impl DeviceEventSender {
    /// Emit one event toward the session task.
    pub fn send(&self, event: DeviceEvent) -> Result<()> {
        self.tx
            .try_send(event)
            .map_err(|e| MuseError::Channel(format!("device event channel: {e}")))
    }
}

/// Notification from the device to the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The loaded source is ready to play.
    SourceReady {
        /// Generation of the `load` this event belongs to.
        generation: u64,
    },
    /// Periodic progress tick.
    Progress {
        /// Generation of the `load` this event belongs to.
        generation: u64,
        /// Elapsed playback time in seconds.
        elapsed_seconds: f64,
    },
    /// The current source played to its end.
    Ended {
        /// Generation of the `load` this event belongs to.
        generation: u64,
    },
    /// Unrecoverable device error.
    Error {
        /// Generation of the `load` this event belongs to.
        generation: u64,
        /// Device-reported reason.
        message: String,
    },
}

impl DeviceEvent {
    /// The generation this event is stamped with.
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            DeviceEvent::SourceReady { generation }
            | DeviceEvent::Progress { generation, .. }
            | DeviceEvent::Ended { generation }
            | DeviceEvent::Error { generation, .. } => *generation,
        }
    }
}

/// Transport primitives of the platform media engine.
///
/// Exclusively owned by the playback controller; no other component may
/// invoke these directly.
pub trait MediaPlaybackDevice: Send {
    /// Bind a new media source. The device must stamp every event it emits
    /// for this source with `generation`.
    fn load(&mut self, url: &str, generation: u64) -> Result<()>;

    /// Begin or resume playback of the loaded source.
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the source bound.
    fn pause(&mut self) -> Result<()>;

    /// Seek the current source back to its start.
    fn seek_to_start(&mut self) -> Result<()>;

    /// Unbind the source and release the transport.
    fn stop(&mut self) -> Result<()>;
}
