//! Engine lifecycle
//!
//! Takes the engine from "no track" to "ready with one region", and back.

use log::{debug, info, warn};

use super::{react, EngineSlot, RegionEditor, SessionState, Transition};
use crate::config::EditorConfig;
use crate::engine::{EngineFactory, RegionBounds, RenderingEngine};
use crate::error::Result;

/// Region shown when a track becomes ready
///
/// Tracks longer than `margin_threshold_secs` keep `margin_secs` off each
/// end; shorter tracks are selected whole.
pub fn default_region(duration: f64, config: &EditorConfig) -> RegionBounds {
    if duration > config.margin_threshold_secs {
        RegionBounds::new(config.margin_secs, duration - config.margin_secs)
    } else {
        RegionBounds::new(0.0, duration)
    }
}

impl<F: EngineFactory> RegionEditor<F> {
    /// Create an engine for a new track and stream `audio` into it
    ///
    /// Any previous engine is torn down first. The editor stays in the
    /// loading state until the engine's ready event is pumped. If the engine
    /// rejects the audio it is destroyed and the error returned.
    pub fn initialize(&mut self, audio: &[u8]) -> Result<()> {
        self.teardown();

        let mut engine = self.factory.create(&self.config.engine);
        if let Err(e) = engine.load(audio) {
            engine.destroy();
            return Err(e);
        }

        info!("[LIFECYCLE] Loading {} bytes of audio", audio.len());
        self.session = SessionState::new();
        self.slot = EngineSlot::Loading(engine);
        Ok(())
    }

    /// Swap the current track for another one
    pub fn replace_track(&mut self, audio: &[u8]) -> Result<()> {
        info!("[LIFECYCLE] Replacing track");
        self.initialize(audio)
    }

    /// Release the engine and forget the session
    ///
    /// Safe to call at any time; without an engine this does nothing.
    pub fn teardown(&mut self) {
        match std::mem::take(&mut self.slot) {
            EngineSlot::Loading(mut engine) | EngineSlot::Ready(mut engine) => {
                engine.destroy();
                self.session = SessionState::new();
                info!("[LIFECYCLE] Engine released");
            }
            EngineSlot::Empty => debug!("[LIFECYCLE] Teardown without an engine"),
        }
    }

    /// Handle the engine's one-time ready event
    ///
    /// A track too short to hold a region (zero length) cannot become ready;
    /// its engine is released and the editor is left empty.
    pub(super) fn on_ready(&mut self) {
        let mut engine = match std::mem::take(&mut self.slot) {
            EngineSlot::Loading(engine) => engine,
            other => {
                debug!("[LIFECYCLE] Ready ignored: engine is not loading");
                self.slot = other;
                return;
            }
        };

        let duration = engine.duration();
        let bounds = match default_region(duration, &self.config).validated(duration) {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!("[LIFECYCLE] {} for a {:.3}s track, releasing engine", e, duration);
                engine.destroy();
                self.session = SessionState::new();
                return;
            }
        };
        let reaction = self.session.apply(
            Transition::Ready { bounds },
            self.config.collision_tolerance_secs,
        );
        info!(
            "[LIFECYCLE] Ready: {:.3}s track, default region {}",
            duration, bounds
        );

        self.slot = EngineSlot::Ready(engine);
        if let Some((engine, _, config)) = self.ready_parts() {
            react(engine, reaction, config.region_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCall, MockEngineFactory};
    use test_case::test_case;

    #[test_case(60.0, 20.0, 40.0 ; "long track gets margins")]
    #[test_case(50.0, 20.0, 30.0 ; "just over threshold")]
    #[test_case(40.0, 0.0, 40.0 ; "threshold itself is whole track")]
    #[test_case(12.5, 0.0, 12.5 ; "short track is whole track")]
    fn test_default_region(duration: f64, start: f64, end: f64) {
        let bounds = default_region(duration, &EditorConfig::default());
        assert_eq!(bounds, RegionBounds::new(start, end));
    }

    fn editor(duration: f64) -> RegionEditor<MockEngineFactory> {
        RegionEditor::new(MockEngineFactory::new(duration), EditorConfig::default())
    }

    #[test]
    fn test_loading_until_ready() {
        let mut editor =
            RegionEditor::new(MockEngineFactory::deferred(60.0), EditorConfig::default());
        assert!(editor.snapshot().is_loading);

        editor.initialize(&[0u8; 16]).unwrap();
        editor.pump_events();
        assert!(editor.snapshot().is_loading);
        assert!(editor.engine().unwrap().regions().is_empty());

        editor.engine_mut().unwrap().fire_ready();
        editor.pump_events();
        assert!(!editor.snapshot().is_loading);
        assert_eq!(editor.engine().unwrap().regions().len(), 1);
    }

    #[test]
    fn test_ready_adds_one_labelless_region() {
        let mut editor = editor(60.0);
        editor.initialize(&[]).unwrap();
        editor.pump_events();

        let engine = editor.engine().unwrap();
        let regions = engine.regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, RegionBounds::new(20.0, 40.0));
        assert_eq!(regions[0].label, None);
        assert_eq!(editor.session().original(), RegionBounds::new(20.0, 40.0));
    }

    #[test]
    fn test_second_ready_is_ignored() {
        let mut editor = editor(60.0);
        editor.initialize(&[]).unwrap();
        editor.pump_events();

        editor.handle_event(crate::engine::EngineEvent::Ready);
        editor.pump_events();
        assert_eq!(editor.engine().unwrap().regions().len(), 1);
    }

    #[test]
    fn test_zero_length_track_never_becomes_ready() {
        let mut editor = editor(0.0);
        editor.initialize(&[]).unwrap();
        editor.pump_events();

        assert!(editor.engine().is_none());
        assert!(!editor.is_ready());
        let snapshot = editor.snapshot();
        assert!(snapshot.is_loading);
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (0.0, 0.0));
    }

    #[test]
    fn test_teardown_destroys_once() {
        let mut editor = editor(60.0);
        editor.initialize(&[]).unwrap();
        editor.pump_events();

        editor.teardown();
        editor.teardown();
        assert!(editor.engine().is_none());
        assert!(editor.snapshot().is_loading);
        assert_eq!(editor.session(), &SessionState::new());
    }

    #[test]
    fn test_replace_track_starts_fresh_engine() {
        let mut editor = editor(60.0);
        editor.initialize(&[1]).unwrap();
        editor.pump_events();

        editor.replace_track(&[2, 2]).unwrap();
        assert!(editor.snapshot().is_loading);
        assert_eq!(
            editor.engine().unwrap().calls(),
            &[EngineCall::Load { len: 2 }]
        );
    }
}
