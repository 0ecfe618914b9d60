//! Mock engine for testing
//!
//! Does no decoding: the track length is fixed up front and every call is
//! recorded, so editor behaviour can be asserted call by call. Drag gestures
//! are simulated with [`MockEngine::drag`] and [`MockEngine::release`].

use log::debug;

use super::clock::PlaybackClock;
use super::region::{Region, RegionBounds, RegionColor, RegionId, RegionLayer};
use super::{EngineConfig, EngineEvent, EngineFactory, RenderingEngine};
use crate::error::{CropError, Result};

/// One call made on a [`MockEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load { len: usize },
    AddRegion { bounds: RegionBounds },
    ClearRegions,
    StripLabel { id: RegionId },
    Play { from: Option<f64> },
    Pause,
    Stop,
    SkipForward,
    SkipBackward,
    Skip { offset: f64 },
    Destroy,
}

/// Scripted stand-in for a rendering engine
#[derive(Debug)]
pub struct MockEngine {
    config: EngineConfig,
    track_duration: f64,
    defer_ready: bool,
    clock: PlaybackClock,
    regions: RegionLayer,
    events: Vec<EngineEvent>,
    calls: Vec<EngineCall>,
    destroyed: bool,
}

impl MockEngine {
    /// Engine whose loaded track lasts `duration` seconds
    pub fn new(config: EngineConfig, duration: f64) -> Self {
        Self {
            config,
            track_duration: duration,
            defer_ready: false,
            clock: PlaybackClock::default(),
            regions: RegionLayer::new(),
            events: Vec::new(),
            calls: Vec::new(),
            destroyed: false,
        }
    }

    /// Hold back the ready event until [`MockEngine::fire_ready`]
    pub fn with_deferred_ready(mut self) -> Self {
        self.defer_ready = true;
        self
    }

    /// Queue the ready event of a deferred load
    pub fn fire_ready(&mut self) {
        self.events.push(EngineEvent::Ready);
    }

    /// Move the playhead without recording a call
    pub fn set_current_time(&mut self, position: f64) {
        self.clock.seek(position);
    }

    /// Simulate dragging the active region's handles to `bounds`
    ///
    /// Queues [`EngineEvent::RegionUpdated`]; returns the region id, or
    /// `None` when no region exists.
    pub fn drag(&mut self, bounds: RegionBounds) -> Option<RegionId> {
        let id = self.regions.first()?.id;
        self.regions.drag(id, bounds);
        self.events.push(EngineEvent::RegionUpdated { id, bounds });
        Some(id)
    }

    /// Simulate releasing the active region at its current bounds
    pub fn release(&mut self) -> Option<RegionId> {
        let region = self.regions.first()?;
        let (id, bounds) = (region.id, region.bounds);
        self.events.push(EngineEvent::RegionUpdateEnd { id, bounds });
        Some(id)
    }

    /// Drag to `bounds` and release in one gesture
    pub fn drag_and_release(&mut self, bounds: RegionBounds) -> Option<RegionId> {
        self.drag(bounds)?;
        self.release()
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&mut self, call: EngineCall) -> bool {
        if self.destroyed {
            debug!("[MOCK] Ignoring {:?} after destroy", call);
            return false;
        }
        self.calls.push(call);
        true
    }
}

impl RenderingEngine for MockEngine {
    fn load(&mut self, audio: &[u8]) -> Result<()> {
        if !self.record(EngineCall::Load { len: audio.len() }) {
            return Err(CropError::EngineDestroyed);
        }
        self.clock.set_duration(self.track_duration);
        if !self.defer_ready {
            self.events.push(EngineEvent::Ready);
        }
        Ok(())
    }

    fn add_region(&mut self, bounds: RegionBounds, color: RegionColor) -> RegionId {
        if !self.record(EngineCall::AddRegion { bounds }) {
            return RegionId::new();
        }
        let id = self.regions.add(bounds, color);
        self.events.push(EngineEvent::RegionCreated { id });
        id
    }

    fn clear_regions(&mut self) {
        if self.record(EngineCall::ClearRegions) {
            self.regions.clear();
        }
    }

    fn regions(&self) -> &[Region] {
        self.regions.as_slice()
    }

    fn strip_region_label(&mut self, id: RegionId) {
        if self.record(EngineCall::StripLabel { id }) {
            self.regions.strip_label(id);
        }
    }

    fn play(&mut self, from: Option<f64>) {
        if !self.record(EngineCall::Play { from }) {
            return;
        }
        if let Some(position) = from {
            self.clock.seek(position);
        }
        self.clock.play();
    }

    fn pause(&mut self) {
        if self.record(EngineCall::Pause) {
            self.clock.pause();
        }
    }

    fn stop(&mut self) {
        if self.record(EngineCall::Stop) {
            self.clock.stop();
        }
    }

    fn skip_forward(&mut self) {
        if self.record(EngineCall::SkipForward) {
            self.clock.skip(self.config.skip_length);
        }
    }

    fn skip_backward(&mut self) {
        if self.record(EngineCall::SkipBackward) {
            self.clock.skip(-self.config.skip_length);
        }
    }

    fn skip(&mut self, offset: f64) {
        if self.record(EngineCall::Skip { offset }) {
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
        if self.record(EngineCall::Destroy) {
            self.regions.clear();
            self.events.clear();
            self.destroyed = true;
        }
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn advance(&mut self, secs: f64) {
        if !self.destroyed {
            self.clock.advance_secs(secs);
        }
    }
}

/// Factory producing [`MockEngine`]s with a fixed track length
#[derive(Debug, Clone, Copy)]
pub struct MockEngineFactory {
    pub duration: f64,
    pub defer_ready: bool,
}

impl MockEngineFactory {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            defer_ready: false,
        }
    }

    /// Engines created by this factory wait for [`MockEngine::fire_ready`]
    pub fn deferred(duration: f64) -> Self {
        Self {
            duration,
            defer_ready: true,
        }
    }
}

impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    fn create(&self, config: &EngineConfig) -> MockEngine {
        let engine = MockEngine::new(config.clone(), self.duration);
        if self.defer_ready {
            engine.with_deferred_ready()
        } else {
            engine
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_records_and_readies() {
        let mut engine = MockEngine::new(EngineConfig::default(), 60.0);
        engine.load(&[1, 2, 3]).unwrap();
        assert_eq!(engine.calls(), &[EngineCall::Load { len: 3 }]);
        assert_eq!(engine.take_events(), vec![EngineEvent::Ready]);
        assert_eq!(engine.duration(), 60.0);
    }

    #[test]
    fn test_deferred_ready() {
        let mut engine = MockEngine::new(EngineConfig::default(), 60.0).with_deferred_ready();
        engine.load(&[]).unwrap();
        assert!(engine.take_events().is_empty());
        engine.fire_ready();
        assert_eq!(engine.take_events(), vec![EngineEvent::Ready]);
    }

    #[test]
    fn test_drag_without_region() {
        let mut engine = MockEngine::new(EngineConfig::default(), 60.0);
        assert_eq!(engine.drag(RegionBounds::new(1.0, 2.0)), None);
        assert_eq!(engine.release(), None);
    }

    #[test]
    fn test_calls_ignored_after_destroy() {
        let mut engine = MockEngine::new(EngineConfig::default(), 60.0);
        engine.destroy();
        engine.play(None);
        engine.destroy();
        assert_eq!(engine.calls(), &[EngineCall::Destroy]);
        assert!(engine.load(&[]).is_err());
    }
}
