//! Playback state machine.
//!
//! [`PlaybackController`] owns the active playlist and transport state and is
//! the only component allowed to drive the [`MediaPlaybackDevice`]. All
//! transitions happen on the session task: device notifications arrive as
//! [`DeviceEvent`] values handed to [`PlaybackController::handle_event`].
//!
//! ```text
//! Idle/Paused/Ended --play--> Loading --SourceReady--> Playing
//! Playing --pause--> Paused --resume--> Playing
//! Playing --Ended--> Ended --auto-advance--> Loading (next index, wrapping)
//! any --device error--> Failed --play/stop--> Loading/Idle
//! ```
//!
//! Every new source bind allocates a fresh generation; events stamped with an
//! older generation belong to a track the user has moved past and are
//! dropped. This replaces per-track progress-callback re-registration: a
//! stale tick can never resurrect an old track.

use std::sync::Arc;
use tracing::{debug, warn};

use super::device::{DeviceEvent, MediaPlaybackDevice};
use crate::music::{Playlist, Track};
use crate::sink::UserInterfaceSink;

/// Default elapsed-time threshold for the `previous()` restart rule.
pub const PREVIOUS_RESTART_THRESHOLD_SECONDS: f64 = 3.0;

/// Lifecycle stage of the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// No source bound.
    Idle,
    /// A source is bound and buffering.
    Loading,
    /// Audible playback.
    Playing,
    /// Playback suspended, source still bound.
    Paused,
    /// The source played to its end.
    Ended,
    /// Unrecoverable device error; exits only via `play` or `stop`.
    Failed,
}

/// State machine owning the playlist, transport state, and device handle.
pub struct PlaybackController<D: MediaPlaybackDevice> {
    device: D,
    playlist: Playlist,
    state: TransportState,
    /// Generation of the most recent source bind.
    generation: u64,
    /// Elapsed seconds on the current track, fed by progress events.
    elapsed_seconds: f64,
    restart_threshold_seconds: f64,
    sink: Arc<dyn UserInterfaceSink>,
}

impl<D: MediaPlaybackDevice> PlaybackController<D> {
    /// Create an idle controller around a device handle.
    pub fn new(device: D, sink: Arc<dyn UserInterfaceSink>) -> Self {
        Self {
            device,
            playlist: Playlist::new(),
            state: TransportState::Idle,
            generation: 0,
            elapsed_seconds: 0.0,
            restart_threshold_seconds: PREVIOUS_RESTART_THRESHOLD_SECONDS,
            sink,
        }
    }

    /// Override the `previous()` restart threshold.
    #[must_use]
    pub fn with_restart_threshold(mut self, seconds: f64) -> Self {
        self.restart_threshold_seconds = seconds;
        self
    }

    /// Current transport state.
    #[must_use]
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// The active playlist.
    #[must_use]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// The track at the playlist position, if any.
    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    /// Elapsed seconds on the current track.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Generation of the most recent source bind. Devices stamp their events
    /// with the generation passed to `load`.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the playlist wholesale and start playing from position 0.
    pub fn play_playlist(&mut self, tracks: Vec<Track>) {
        self.playlist.replace(tracks);
        self.sink.playlist_changed(&self.playlist);
        self.load_current();
    }

    /// Play a single track, replacing any existing playlist.
    pub fn play(&mut self, track: Track) {
        self.play_playlist(vec![track]);
    }

    /// Toggle between playing and paused. Resumes from `Ended` by replaying
    /// the current position. No-op in `Idle`, `Loading`, and `Failed`.
    pub fn toggle_play_pause(&mut self) {
        match self.state {
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.resume(),
            TransportState::Ended if !self.playlist.is_empty() => self.load_current(),
            _ => {}
        }
    }

    /// Pause playback. Idempotent; a no-op unless currently `Playing`.
    pub fn pause(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        match self.device.pause() {
            Ok(()) => self.set_state(TransportState::Paused),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    /// Resume playback. Idempotent; a no-op unless currently `Paused`.
    pub fn resume(&mut self) {
        if self.state != TransportState::Paused {
            return;
        }
        match self.device.play() {
            Ok(()) => self.set_state(TransportState::Playing),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    /// Advance to the next track, wrapping modulo playlist length.
    /// Not callable while `Loading`; no-op on an empty playlist.
    pub fn next(&mut self) {
        if self.state == TransportState::Loading || self.playlist.is_empty() {
            return;
        }
        self.playlist.advance();
        self.sink.playlist_changed(&self.playlist);
        self.load_current();
    }

    /// Go back one track, with the media-player ergonomics rule: past the
    /// restart threshold this restarts the *current* track instead of moving
    /// the index. Not callable while `Loading`; no-op on an empty playlist.
    pub fn previous(&mut self) {
        if self.state == TransportState::Loading || self.playlist.is_empty() {
            return;
        }
        if self.elapsed_seconds > self.restart_threshold_seconds {
            self.elapsed_seconds = 0.0;
            if let Err(e) = self.device.seek_to_start() {
                self.fail(&e.to_string());
            }
            return;
        }
        self.playlist.step_back();
        self.sink.playlist_changed(&self.playlist);
        self.load_current();
    }

    /// Release the transport and return to `Idle`. Exits `Failed`.
    pub fn stop(&mut self) {
        if let Err(e) = self.device.stop() {
            warn!(error = %e, "device stop failed; resetting state anyway");
        }
        self.elapsed_seconds = 0.0;
        self.set_state(TransportState::Idle);
    }

    /// Feed a device notification into the state machine.
    ///
    /// Events stamped with a generation other than the current one are
    /// dropped: they belong to a source the user has already moved past.
    pub fn handle_event(&mut self, event: DeviceEvent) {
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation(),
                current_generation = self.generation,
                "dropping stale device event"
            );
            return;
        }

        match event {
            DeviceEvent::SourceReady { .. } => {
                if self.state == TransportState::Loading {
                    match self.device.play() {
                        Ok(()) => self.set_state(TransportState::Playing),
                        Err(e) => self.fail(&e.to_string()),
                    }
                }
            }
            DeviceEvent::Progress {
                elapsed_seconds, ..
            } => {
                self.elapsed_seconds = elapsed_seconds;
            }
            DeviceEvent::Ended { .. } => {
                self.set_state(TransportState::Ended);
                // Seamless auto-advance; a one-track playlist wraps onto
                // itself and restarts from position zero.
                if !self.playlist.is_empty() {
                    self.playlist.advance();
                    self.sink.playlist_changed(&self.playlist);
                    self.load_current();
                }
            }
            DeviceEvent::Error { message, .. } => self.fail(&message),
        }
    }

    /// Bind the playlist's current track as a new source.
    fn load_current(&mut self) {
        let Some(track) = self.playlist.current() else {
            self.set_state(TransportState::Idle);
            return;
        };
        let url = track.audio_url.clone();
        // New generation per bind; stale events from the previous source are
        // rejected in handle_event.
        self.generation += 1;
        self.elapsed_seconds = 0.0;
        match self.device.load(&url, self.generation) {
            Ok(()) => self.set_state(TransportState::Loading),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    fn fail(&mut self, reason: &str) {
        warn!(error = reason, "playback device failure");
        self.set_state(TransportState::Failed);
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "transport transition");
            self.state = state;
            self.sink.transport_changed(state);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::error::MuseError;
    use crate::sink::NullSink;
    use std::sync::Mutex;

    /// Device stub recording every command; `failing` arms load/play errors.
    #[derive(Default)]
    struct StubDevice {
        commands: Arc<Mutex<Vec<String>>>,
        failing: Arc<Mutex<bool>>,
    }

    impl StubDevice {
        fn recording() -> (Self, Arc<Mutex<Vec<String>>>) {
            let commands = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    commands: Arc::clone(&commands),
                    failing: Arc::new(Mutex::new(false)),
                },
                commands,
            )
        }

        fn record(&self, command: String) {
            self.commands.lock().unwrap().push(command);
        }

        fn is_failing(&self) -> bool {
            *self.failing.lock().unwrap()
        }
    }

    impl MediaPlaybackDevice for StubDevice {
        fn load(&mut self, url: &str, generation: u64) -> crate::Result<()> {
            if self.is_failing() {
                return Err(MuseError::Playback("load failed".into()));
            }
            self.record(format!("load {url} gen={generation}"));
            Ok(())
        }

        fn play(&mut self) -> crate::Result<()> {
            if self.is_failing() {
                return Err(MuseError::Playback("play failed".into()));
            }
            self.record("play".into());
            Ok(())
        }

        fn pause(&mut self) -> crate::Result<()> {
            self.record("pause".into());
            Ok(())
        }

        fn seek_to_start(&mut self) -> crate::Result<()> {
            self.record("seek".into());
            Ok(())
        }

        fn stop(&mut self) -> crate::Result<()> {
            self.record("stop".into());
            Ok(())
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_owned(),
            title: format!("Title {id}"),
            artist: "Artist".to_owned(),
            artwork_url: None,
            audio_url: format!("https://audio.example/{id}.mp3"),
            duration_seconds: 180.0,
        }
    }

    fn controller() -> PlaybackController<StubDevice> {
        PlaybackController::new(StubDevice::default(), Arc::new(NullSink))
    }

    #[test]
    fn play_transitions_idle_loading_playing() {
        let mut c = controller();
        assert_eq!(c.state(), TransportState::Idle);

        c.play_playlist(vec![track("a"), track("b"), track("c")]);
        assert_eq!(c.state(), TransportState::Loading);
        assert_eq!(c.playlist().current_index(), 0);

        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });
        assert_eq!(c.state(), TransportState::Playing);
        assert_eq!(c.current_track().unwrap().id, "a");
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut c = controller();
        c.play(track("a"));
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });

        c.pause();
        assert_eq!(c.state(), TransportState::Paused);
        c.resume();
        assert_eq!(c.state(), TransportState::Playing);
    }

    #[test]
    fn pause_is_idempotent() {
        let (device, commands) = StubDevice::recording();
        let mut c = PlaybackController::new(device, Arc::new(NullSink));
        c.play(track("a"));
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });

        c.pause();
        c.pause();
        c.pause();
        assert_eq!(c.state(), TransportState::Paused);
        let pause_count = commands
            .lock()
            .unwrap()
            .iter()
            .filter(|cmd| cmd.as_str() == "pause")
            .count();
        assert_eq!(pause_count, 1);
    }

    #[test]
    fn ended_auto_advances_to_next_track() {
        let mut c = controller();
        c.play_playlist(vec![track("a"), track("b")]);
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });

        c.handle_event(DeviceEvent::Ended { generation });
        assert_eq!(c.state(), TransportState::Loading);
        assert_eq!(c.current_track().unwrap().id, "b");
    }

    #[test]
    fn single_track_playlist_loops_on_itself() {
        let mut c = controller();
        c.play(track("only"));
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });

        c.handle_event(DeviceEvent::Ended { generation });
        // Restarted from position zero rather than stalling in Ended.
        assert_eq!(c.state(), TransportState::Loading);
        assert_eq!(c.playlist().current_index(), 0);
        assert!(c.generation() > generation);
    }

    #[test]
    fn previous_within_threshold_steps_back() {
        let mut c = controller();
        c.play_playlist(vec![track("a"), track("b"), track("c")]);
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });
        c.next();
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });
        assert_eq!(c.current_track().unwrap().id, "b");

        c.handle_event(DeviceEvent::Progress {
            generation,
            elapsed_seconds: 1.0,
        });
        c.previous();
        assert_eq!(c.current_track().unwrap().id, "a");
    }

    #[test]
    fn previous_past_threshold_restarts_current_track() {
        let (device, commands) = StubDevice::recording();
        let mut c = PlaybackController::new(device, Arc::new(NullSink));
        c.play_playlist(vec![track("a"), track("b")]);
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });
        c.handle_event(DeviceEvent::Progress {
            generation,
            elapsed_seconds: 4.0,
        });

        c.previous();
        // Index unchanged, track restarted via seek.
        assert_eq!(c.current_track().unwrap().id, "a");
        assert!((c.elapsed_seconds() - 0.0).abs() < f64::EPSILON);
        assert!(commands.lock().unwrap().iter().any(|cmd| cmd == "seek"));
    }

    #[test]
    fn previous_wraps_from_first_track() {
        let mut c = controller();
        c.play_playlist(vec![track("a"), track("b"), track("c")]);
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });

        c.previous();
        assert_eq!(c.current_track().unwrap().id, "c");
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut c = controller();
        c.play(track("old"));
        let stale_generation = c.generation();

        // User moves on before the first source is ready.
        c.play(track("new"));
        let current_generation = c.generation();

        c.handle_event(DeviceEvent::SourceReady {
            generation: stale_generation,
        });
        // Stale ready callback must not start playback of anything.
        assert_eq!(c.state(), TransportState::Loading);

        c.handle_event(DeviceEvent::SourceReady {
            generation: current_generation,
        });
        assert_eq!(c.state(), TransportState::Playing);
        assert_eq!(c.current_track().unwrap().id, "new");
    }

    #[test]
    fn stale_progress_does_not_touch_elapsed() {
        let mut c = controller();
        c.play(track("a"));
        let stale = c.generation();
        c.play(track("b"));

        c.handle_event(DeviceEvent::Progress {
            generation: stale,
            elapsed_seconds: 99.0,
        });
        assert!((c.elapsed_seconds() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn device_load_error_enters_failed_without_propagating() {
        let device = StubDevice::default();
        *device.failing.lock().unwrap() = true;
        let mut c = PlaybackController::new(device, Arc::new(NullSink));

        c.play(track("a"));
        assert_eq!(c.state(), TransportState::Failed);
    }

    #[test]
    fn device_play_error_on_ready_enters_failed() {
        let device = StubDevice::default();
        let failing = Arc::clone(&device.failing);
        let mut c = PlaybackController::new(device, Arc::new(NullSink));

        c.play(track("a"));
        assert_eq!(c.state(), TransportState::Loading);

        // The source binds fine but starting playback fails.
        *failing.lock().unwrap() = true;
        let generation = c.generation();
        c.handle_event(DeviceEvent::SourceReady { generation });
        assert_eq!(c.state(), TransportState::Failed);
    }

    #[test]
    fn device_error_enters_failed_and_stop_recovers() {
        let mut c = controller();
        c.play(track("a"));
        let generation = c.generation();
        c.handle_event(DeviceEvent::Error {
            generation,
            message: "decoder died".into(),
        });
        assert_eq!(c.state(), TransportState::Failed);

        // Pause/resume are no-ops in Failed.
        c.pause();
        c.resume();
        assert_eq!(c.state(), TransportState::Failed);

        c.stop();
        assert_eq!(c.state(), TransportState::Idle);
    }

    #[test]
    fn play_recovers_from_failed() {
        let mut c = controller();
        c.play(track("a"));
        let generation = c.generation();
        c.handle_event(DeviceEvent::Error {
            generation,
            message: "boom".into(),
        });
        assert_eq!(c.state(), TransportState::Failed);

        c.play(track("b"));
        assert_eq!(c.state(), TransportState::Loading);
    }

    #[test]
    fn next_is_noop_while_loading_or_empty() {
        let mut c = controller();
        c.next();
        assert_eq!(c.state(), TransportState::Idle);

        c.play_playlist(vec![track("a"), track("b")]);
        assert_eq!(c.state(), TransportState::Loading);
        c.next();
        assert_eq!(c.current_track().unwrap().id, "a");
    }

    #[test]
    fn toggle_resumes_from_ended_on_empty_noop() {
        let mut c = controller();
        // Nothing loaded: toggle does nothing.
        c.toggle_play_pause();
        assert_eq!(c.state(), TransportState::Idle);
    }

    #[test]
    fn each_bind_gets_a_fresh_generation() {
        let (device, commands) = StubDevice::recording();
        let mut c = PlaybackController::new(device, Arc::new(NullSink));
        c.play(track("a"));
        c.play(track("b"));
        let recorded = commands.lock().unwrap();
        assert!(recorded[0].contains("gen=1"));
        assert!(recorded[1].contains("gen=2"));
    }
}
