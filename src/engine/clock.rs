//! Playback Clock
//!
//! Tracks the transport of an engine: whether audio is running and where the
//! playhead is. Positions are always clamped to `[0, duration]`; the clock
//! pauses by itself when the playhead runs into the end of the track.

use std::fmt;

use log::debug;

/// Clock states representing the current playback mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    /// Transport is paused (default state)
    #[default]
    Paused,
    /// Audio is actively playing
    Playing,
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockState::Paused => write!(f, "Paused"),
            ClockState::Playing => write!(f, "Playing"),
        }
    }
}

/// Playhead and run state of one loaded track
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,

    /// Current playhead position in seconds
    position: f64,

    /// Track length in seconds; zero until audio is loaded
    duration: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// Create a paused clock at position 0 with no loaded duration
    ///
    /// # Example
    /// ```
    /// use wavecrop::engine::PlaybackClock;
    /// let clock = PlaybackClock::new();
    /// assert!(clock.is_paused());
    /// assert_eq!(clock.position(), 0.0);
    /// ```
    pub fn new() -> Self {
        Self {
            state: ClockState::Paused,
            position: 0.0,
            duration: 0.0,
        }
    }

    /// Set the track length, re-clamping the playhead
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.position = self.clamp(self.position);
    }

    /// Start running from the current position
    ///
    /// # Example
    /// ```
    /// use wavecrop::engine::PlaybackClock;
    /// let mut clock = PlaybackClock::new();
    /// clock.set_duration(10.0);
    /// clock.play();
    /// assert!(clock.is_playing());
    /// ```
    pub fn play(&mut self) {
        if self.state == ClockState::Playing {
            debug!("[CLOCK] Already playing");
            return;
        }
        self.state = ClockState::Playing;
        debug!("[CLOCK] Play from {:.3}s", self.position);
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Paused {
            debug!("[CLOCK] Already paused");
            return;
        }
        self.state = ClockState::Paused;
        debug!("[CLOCK] Paused at {:.3}s", self.position);
    }

    /// Pause and return the playhead to the start
    pub fn stop(&mut self) {
        self.state = ClockState::Paused;
        self.position = 0.0;
        debug!("[CLOCK] Stopped, playhead reset to 0");
    }

    /// Move the playhead to an absolute position (clamped)
    pub fn seek(&mut self, position: f64) {
        self.position = self.clamp(position);
        debug!("[CLOCK] Seek to {:.3}s", self.position);
    }

    /// Move the playhead relative to where it is (clamped)
    pub fn skip(&mut self, offset: f64) {
        self.seek(self.position + offset);
    }

    /// Advance a running clock by wall-clock seconds
    ///
    /// Reaching the end of the track pauses the clock there.
    pub fn advance_secs(&mut self, secs: f64) {
        if self.state != ClockState::Playing || secs <= 0.0 {
            return;
        }
        self.position = self.clamp(self.position + secs);
        if self.position >= self.duration {
            self.state = ClockState::Paused;
            debug!("[CLOCK] Reached end of track at {:.3}s", self.duration);
        }
    }

    fn clamp(&self, position: f64) -> f64 {
        if position.is_nan() {
            return 0.0;
        }
        position.clamp(0.0, self.duration)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }
}
