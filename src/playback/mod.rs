//! Playback: the transport state machine and the media device collaborator
//! interface it drives.

pub mod controller;
pub mod device;

pub use controller::{PREVIOUS_RESTART_THRESHOLD_SECONDS, PlaybackController, TransportState};
pub use device::{
    DEVICE_EVENT_CAPACITY, DeviceEvent, DeviceEventSender, MediaPlaybackDevice,
    device_event_channel,
};
