//! Rendering Engine
//!
//! The engine decodes audio, draws the waveform, owns the draggable regions
//! and runs the transport. The editor drives it through [`RenderingEngine`]
//! and reacts to the [`EngineEvent`]s it queues.
//!
//! Two implementations ship with the crate:
//! - [`HeadlessEngine`] - decodes WAV bytes and runs a real playback clock
//! - [`MockEngine`] - scripted duration and a recorded call log, for tests

pub mod clock;
pub mod decode;
pub mod headless;
pub mod mock;
pub mod region;
pub mod waveform;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use clock::{ClockState, PlaybackClock};
pub use decode::{decode_wav, encode_test_tone, DecodedAudio};
pub use headless::{HeadlessEngine, HeadlessEngineFactory};
pub use mock::{EngineCall, MockEngine, MockEngineFactory};
pub use region::{Region, RegionBounds, RegionColor, RegionId, RegionLayer};
pub use waveform::{compute_peaks, Peak};

/// Default skip increment in seconds
pub const DEFAULT_SKIP_LENGTH: f64 = 5.0;

/// Events an engine emits, drained by the editor in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum EngineEvent {
    /// Audio finished loading; duration is known and regions may be added
    Ready,
    /// A region element was created
    RegionCreated { id: RegionId },
    /// A region handle moved; fired continuously while dragging
    RegionUpdated { id: RegionId, bounds: RegionBounds },
    /// The user released a region handle
    RegionUpdateEnd { id: RegionId, bounds: RegionBounds },
}

/// Engine plugins the editor relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePlugin {
    /// Vertical cursor line following the mouse
    Cursor,
    /// Draggable regions
    Regions,
}

/// Construction parameters of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target surface the waveform is drawn into
    pub container: String,
    pub wave_color: String,
    pub progress_color: String,
    pub cursor_color: String,
    /// Seconds moved by `skip_forward` / `skip_backward`
    pub skip_length: f64,
    pub plugins: Vec<EnginePlugin>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            container: "#waveform".to_string(),
            wave_color: "#a0a0a0".to_string(),
            progress_color: "#5a5a5a".to_string(),
            cursor_color: "#000000".to_string(),
            skip_length: DEFAULT_SKIP_LENGTH,
            plugins: vec![EnginePlugin::Cursor, EnginePlugin::Regions],
        }
    }
}

/// Contract of a waveform rendering and playback engine
///
/// All calls are synchronous. Events produced by a call are queued and
/// handed out by [`RenderingEngine::take_events`]. Once destroyed, an
/// engine ignores further calls.
pub trait RenderingEngine {
    /// Stream audio in; queues [`EngineEvent::Ready`] once decoded
    fn load(&mut self, audio: &[u8]) -> Result<()>;

    /// Add a region and queue [`EngineEvent::RegionCreated`]
    fn add_region(&mut self, bounds: RegionBounds, color: RegionColor) -> RegionId;

    fn clear_regions(&mut self);

    fn regions(&self) -> &[Region];

    /// Remove the hover label the engine attached to a region element
    fn strip_region_label(&mut self, id: RegionId);

    /// Play from `from` seconds, or from the current position
    fn play(&mut self, from: Option<f64>);

    fn pause(&mut self);

    /// Pause and seek to the start
    fn stop(&mut self);

    /// Skip ahead by the configured skip length
    fn skip_forward(&mut self);

    /// Skip back by the configured skip length
    fn skip_backward(&mut self);

    /// Move the playhead by `offset` seconds
    fn skip(&mut self, offset: f64);

    /// Track length in seconds; zero before ready
    fn duration(&self) -> f64;

    fn current_time(&self) -> f64;

    fn is_playing(&self) -> bool;

    fn take_events(&mut self) -> Vec<EngineEvent>;

    /// Release all resources
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;

    /// Let `secs` of wall-clock time pass; engines without a clock ignore it
    fn advance(&mut self, _secs: f64) {}
}

/// Builds engines against a configuration
pub trait EngineFactory {
    type Engine: RenderingEngine;

    fn create(&self, config: &EngineConfig) -> Self::Engine;
}
