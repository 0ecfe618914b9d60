//! Region reconciliation
//!
//! Keeps exactly one well-formed region while the user drags handles. Drag
//! updates are previews; only the release commits bounds.

use log::{debug, warn};

use super::{react, Reaction, RegionEditor, Transition};
use crate::engine::{EngineFactory, RegionBounds, RegionId, RenderingEngine};

/// Events for a region that was cleared by a recreation are stale
fn holds_region<E: RenderingEngine>(engine: &E, id: RegionId) -> bool {
    engine.regions().iter().any(|region| region.id == id)
}

impl<F: EngineFactory> RegionEditor<F> {
    /// A region element appeared; hide the engine's hover label
    pub(super) fn on_region_created(&mut self, id: RegionId) {
        if let Some(engine) = self.slot.engine_mut() {
            engine.strip_region_label(id);
        }
    }

    /// A handle moved mid-drag
    ///
    /// Handles within the collision tolerance throw the drag away: the last
    /// committed region is recreated and playback resumes from it if the
    /// session was playing.
    pub(super) fn on_region_updated(&mut self, id: RegionId, bounds: RegionBounds) {
        let Some((engine, session, config)) = self.ready_parts() else {
            debug!("[RECONCILE] Drag ignored: engine not ready");
            return;
        };
        if !holds_region(engine, id) {
            debug!("[RECONCILE] Drag of cleared region {} ignored", id);
            return;
        }

        engine.strip_region_label(id);
        let reaction = session.apply(
            Transition::RegionUpdated { bounds },
            config.collision_tolerance_secs,
        );
        if reaction != Reaction::None {
            debug!(
                "[RECONCILE] Handles collided at {}, restoring {}",
                bounds,
                session.cut()
            );
        }
        react(engine, reaction, config.region_color);
    }

    /// The user let go of a handle; commit the moved edge(s) and preview
    ///
    /// Bounds outside the track, reversed, or within the collision tolerance
    /// are refused and the last committed region is put back.
    pub(super) fn on_region_update_end(&mut self, id: RegionId, bounds: RegionBounds) {
        let Some((engine, session, config)) = self.ready_parts() else {
            debug!("[RECONCILE] Release ignored: engine not ready");
            return;
        };
        if !holds_region(engine, id) {
            debug!("[RECONCILE] Release of cleared region {} ignored", id);
            return;
        }

        engine.strip_region_label(id);
        let reaction = match bounds.validated(engine.duration()) {
            Ok(bounds) => session.apply(
                Transition::RegionCommitted { bounds },
                config.collision_tolerance_secs,
            ),
            Err(e) => {
                warn!("[RECONCILE] {}, restoring {}", e, session.cut());
                session.restore_committed()
            }
        };
        debug!(
            "[RECONCILE] Committed {} ({:?})",
            session.cut(),
            reaction
        );
        react(engine, reaction, config.region_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::engine::{EngineCall, MockEngineFactory};

    fn ready_editor(duration: f64) -> RegionEditor<MockEngineFactory> {
        let mut editor = RegionEditor::new(MockEngineFactory::new(duration), EditorConfig::default());
        editor.initialize(&[]).unwrap();
        editor.pump_events();
        editor.engine_mut().unwrap().clear_calls();
        editor
    }

    #[test]
    fn test_commit_end_edge_previews_from_end() {
        let mut editor = ready_editor(60.0);
        editor
            .engine_mut()
            .unwrap()
            .drag_and_release(RegionBounds::new(20.0, 25.0));
        editor.pump_events();

        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 25.0));
        assert!(snapshot.is_playing);
        assert!(snapshot.was_region_changed);

        let engine = editor.engine().unwrap();
        assert!(engine.calls().contains(&EngineCall::Play { from: Some(25.0) }));
        assert!(engine.is_playing());
        assert_eq!(engine.current_time(), 25.0);
    }

    #[test]
    fn test_collision_recreates_through_clear_and_add() {
        let mut editor = ready_editor(60.0);
        editor
            .engine_mut()
            .unwrap()
            .drag(RegionBounds::new(30.1, 30.2));
        editor.pump_events();

        let engine = editor.engine().unwrap();
        let calls = engine.calls();
        let clear = calls.iter().position(|c| *c == EngineCall::ClearRegions).unwrap();
        assert_eq!(
            calls[clear + 1],
            EngineCall::AddRegion {
                bounds: RegionBounds::new(20.0, 40.0)
            }
        );
        assert!(!calls.iter().any(|c| matches!(c, EngineCall::Play { .. })));

        assert_eq!(engine.regions().len(), 1);
        assert_eq!(engine.regions()[0].bounds, RegionBounds::new(20.0, 40.0));
        assert_eq!(engine.regions()[0].label, None);
    }

    #[test]
    fn test_updates_outside_tolerance_only_strip_label() {
        let mut editor = ready_editor(60.0);
        let id = editor
            .engine_mut()
            .unwrap()
            .drag(RegionBounds::new(22.0, 38.0))
            .unwrap();
        editor.pump_events();

        assert_eq!(
            editor.engine().unwrap().calls(),
            &[EngineCall::StripLabel { id }]
        );
        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
    }

    #[test]
    fn test_collided_drag_then_release_keeps_committed_region() {
        let mut editor = ready_editor(60.0);
        editor
            .engine_mut()
            .unwrap()
            .drag_and_release(RegionBounds::new(30.1, 30.2));
        editor.pump_events();

        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
        assert!(!snapshot.is_playing);
        assert!(!snapshot.was_region_changed);

        let engine = editor.engine().unwrap();
        assert_eq!(engine.regions().len(), 1);
        assert_eq!(engine.regions()[0].bounds, RegionBounds::new(20.0, 40.0));
        assert!(!engine.calls().iter().any(|c| matches!(c, EngineCall::Play { .. })));
    }

    #[test]
    fn test_release_of_unknown_region_is_ignored() {
        let mut editor = ready_editor(60.0);
        editor.handle_event(crate::engine::EngineEvent::RegionUpdateEnd {
            id: RegionId::new(),
            bounds: RegionBounds::new(22.0, 30.0),
        });

        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
        assert!(editor.engine().unwrap().calls().is_empty());
    }

    #[test]
    fn test_release_outside_track_restores_region() {
        let mut editor = ready_editor(60.0);
        editor
            .engine_mut()
            .unwrap()
            .drag_and_release(RegionBounds::new(20.0, 75.0));
        editor.pump_events();

        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
        assert!(!snapshot.is_playing);
        let engine = editor.engine().unwrap();
        assert_eq!(engine.regions().len(), 1);
        assert_eq!(engine.regions()[0].bounds, RegionBounds::new(20.0, 40.0));
    }

    #[test]
    fn test_drag_events_before_ready_are_ignored() {
        let mut editor =
            RegionEditor::new(MockEngineFactory::deferred(60.0), EditorConfig::default());
        editor.initialize(&[]).unwrap();

        editor.handle_event(crate::engine::EngineEvent::RegionUpdateEnd {
            id: RegionId::new(),
            bounds: RegionBounds::new(1.0, 2.0),
        });
        assert_eq!(editor.snapshot().cut_end, 0.0);
        assert!(!editor.snapshot().is_playing);
    }
}
