//! Headless engine
//!
//! A [`RenderingEngine`] with no drawing surface: it decodes WAV bytes,
//! keeps the region overlay as data, exposes the waveform envelope as
//! [`Peak`] columns and runs the transport on a [`PlaybackClock`] that is
//! advanced explicitly.

use log::{debug, info, warn};

use super::clock::PlaybackClock;
use super::decode::{decode_wav, DecodedAudio};
use super::region::{Region, RegionBounds, RegionColor, RegionId, RegionLayer};
use super::waveform::{compute_peaks, envelope_peak, linear_to_db, Peak};
use super::{EngineConfig, EngineEvent, EngineFactory, RenderingEngine};
use crate::error::{CropError, Result};

/// Engine that decodes audio in-process and renders nothing
#[derive(Debug)]
pub struct HeadlessEngine {
    config: EngineConfig,
    clock: PlaybackClock,
    regions: RegionLayer,
    events: Vec<EngineEvent>,
    audio: Option<DecodedAudio>,
    destroyed: bool,
}

impl HeadlessEngine {
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            "[HEADLESS] Created against '{}' with plugins {:?}",
            config.container, config.plugins
        );
        Self {
            config,
            clock: PlaybackClock::default(),
            regions: RegionLayer::new(),
            events: Vec::new(),
            audio: None,
            destroyed: false,
        }
    }

    /// Waveform envelope of the loaded track; empty before load
    pub fn peaks(&self, buckets: usize) -> Vec<Peak> {
        self.audio
            .as_ref()
            .map(|audio| compute_peaks(&audio.samples, buckets))
            .unwrap_or_default()
    }

    /// Loudest point of the loaded track in dBFS; `None` before load
    pub fn peak_level_db(&self) -> Option<f32> {
        let audio = self.audio.as_ref()?;
        Some(linear_to_db(envelope_peak(&compute_peaks(&audio.samples, 1))))
    }

    pub fn audio(&self) -> Option<&DecodedAudio> {
        self.audio.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulate the user moving a region's handles
    ///
    /// Queues [`EngineEvent::RegionUpdated`]. Returns false if the region
    /// does not exist.
    pub fn drag_region(&mut self, id: RegionId, bounds: RegionBounds) -> bool {
        if !self.alive("drag_region") || !self.regions.drag(id, bounds) {
            return false;
        }
        self.events.push(EngineEvent::RegionUpdated { id, bounds });
        true
    }

    /// Simulate the user letting go of a region's handles
    ///
    /// Queues [`EngineEvent::RegionUpdateEnd`] with the region's current
    /// bounds. Returns false if the region does not exist.
    pub fn release_region(&mut self, id: RegionId) -> bool {
        if !self.alive("release_region") {
            return false;
        }
        match self.regions.get(id) {
            Some(region) => {
                let bounds = region.bounds;
                self.events.push(EngineEvent::RegionUpdateEnd { id, bounds });
                true
            }
            None => false,
        }
    }

    fn alive(&self, operation: &str) -> bool {
        if self.destroyed {
            warn!("[HEADLESS] {} called on a destroyed engine", operation);
        }
        !self.destroyed
    }
}

impl RenderingEngine for HeadlessEngine {
    fn load(&mut self, audio: &[u8]) -> Result<()> {
        if self.destroyed {
            return Err(CropError::EngineDestroyed);
        }

        let decoded = decode_wav(audio)?;
        self.clock.set_duration(decoded.duration());
        self.clock.stop();
        info!(
            "[HEADLESS] Loaded {:.3}s of audio ({} Hz, {} channel(s))",
            decoded.duration(),
            decoded.sample_rate,
            decoded.source_channels
        );
        self.audio = Some(decoded);
        self.events.push(EngineEvent::Ready);
        Ok(())
    }

    fn add_region(&mut self, bounds: RegionBounds, color: RegionColor) -> RegionId {
        if !self.alive("add_region") {
            return RegionId::new();
        }
        let id = self.regions.add(bounds, color);
        debug!("[HEADLESS] Region {} added at {}", id, bounds);
        self.events.push(EngineEvent::RegionCreated { id });
        id
    }

    fn clear_regions(&mut self) {
        if self.alive("clear_regions") {
            self.regions.clear();
        }
    }

    fn regions(&self) -> &[Region] {
        self.regions.as_slice()
    }

    fn strip_region_label(&mut self, id: RegionId) {
        if self.alive("strip_region_label") {
            self.regions.strip_label(id);
        }
    }

    fn play(&mut self, from: Option<f64>) {
        if !self.alive("play") {
            return;
        }
        if let Some(position) = from {
            self.clock.seek(position);
        }
        self.clock.play();
    }

    fn pause(&mut self) {
        if self.alive("pause") {
            self.clock.pause();
        }
    }

    fn stop(&mut self) {
        if self.alive("stop") {
            self.clock.stop();
        }
    }

    fn skip_forward(&mut self) {
        let step = self.config.skip_length;
        self.skip(step);
    }

    fn skip_backward(&mut self) {
        let step = self.config.skip_length;
        self.skip(-step);
    }

    fn skip(&mut self, offset: f64) {
        if self.alive("skip") {
            self.clock.skip(offset);
        }
    }

    fn duration(&self) -> f64 {
        self.clock.duration()
    }

    fn current_time(&self) -> f64 {
        self.clock.position()
    }

    fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.clock.stop();
        self.regions.clear();
        self.events.clear();
        self.audio = None;
        self.destroyed = true;
        info!("[HEADLESS] Engine destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn advance(&mut self, secs: f64) {
        if self.alive("advance") {
            self.clock.advance_secs(secs);
        }
    }
}

/// Factory producing [`HeadlessEngine`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessEngineFactory;

impl EngineFactory for HeadlessEngineFactory {
    type Engine = HeadlessEngine;

    fn create(&self, config: &EngineConfig) -> HeadlessEngine {
        HeadlessEngine::new(config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::decode::encode_test_tone;

    fn loaded(duration: f64) -> HeadlessEngine {
        let mut engine = HeadlessEngine::new(EngineConfig::default());
        let bytes = encode_test_tone(440.0, duration, 8000, 1).unwrap();
        engine.load(&bytes).unwrap();
        engine
    }

    #[test]
    fn test_load_queues_ready() {
        let mut engine = loaded(3.0);
        assert_eq!(engine.take_events(), vec![EngineEvent::Ready]);
        assert!(engine.take_events().is_empty());
        assert!((engine.duration() - 3.0).abs() < 1e-9);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_peak_level_of_half_scale_tone() {
        let engine = HeadlessEngine::new(EngineConfig::default());
        assert_eq!(engine.peak_level_db(), None);

        let db = loaded(2.0).peak_level_db().unwrap();
        assert!((db - -6.02).abs() < 0.1, "peak level {}", db);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut engine = HeadlessEngine::new(EngineConfig::default());
        assert!(engine.load(b"RIFF....nope").is_err());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_skip_uses_configured_length() {
        let mut engine = loaded(30.0);
        engine.skip_forward();
        assert_eq!(engine.current_time(), 5.0);
        engine.skip_forward();
        engine.skip_backward();
        assert_eq!(engine.current_time(), 5.0);
        engine.skip_backward();
        engine.skip_backward();
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_play_from_and_advance() {
        let mut engine = loaded(10.0);
        engine.play(Some(4.0));
        assert!(engine.is_playing());
        engine.advance(1.5);
        assert!((engine.current_time() - 5.5).abs() < 1e-9);
        engine.stop();
        assert!(!engine.is_playing());
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_drag_and_release_queue_events() {
        let mut engine = loaded(60.0);
        engine.take_events();
        let id = engine.add_region(RegionBounds::new(20.0, 40.0), RegionColor::default());

        assert!(engine.drag_region(id, RegionBounds::new(20.0, 25.0)));
        assert!(engine.release_region(id));

        let bounds = RegionBounds::new(20.0, 25.0);
        assert_eq!(
            engine.take_events(),
            vec![
                EngineEvent::RegionCreated { id },
                EngineEvent::RegionUpdated { id, bounds },
                EngineEvent::RegionUpdateEnd { id, bounds },
            ]
        );
    }

    #[test]
    fn test_peaks_follow_loaded_audio() {
        let engine = loaded(1.0);
        let peaks = engine.peaks(100);
        assert_eq!(peaks.len(), 100);
        assert!(peaks.iter().all(|p| p.max <= 0.5 && p.min >= -0.5));
    }

    #[test]
    fn test_destroy_is_idempotent_and_final() {
        let mut engine = loaded(10.0);
        engine.destroy();
        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(engine.peaks(10).is_empty());

        engine.play(None);
        assert!(!engine.is_playing());
        assert!(matches!(
            engine.load(&encode_test_tone(440.0, 1.0, 8000, 1).unwrap()),
            Err(CropError::EngineDestroyed)
        ));
    }
}
