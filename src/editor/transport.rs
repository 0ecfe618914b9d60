//! Transport intents
//!
//! Play/pause, skips and jumps, cancel and cut. Every intent is a silent
//! no-op until the engine is ready.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use super::{recreate_region, RegionEditor};
use crate::engine::{EngineFactory, RenderingEngine};

/// Direction of a fixed-increment skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipDirection {
    Forward,
    Backward,
}

/// Target of a jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JumpTarget {
    Start,
    End,
}

/// User-visible notice returned by intents that cannot act
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "kebab-case")]
pub enum Notice {
    NotImplemented { operation: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotImplemented { operation } => {
                write!(f, "'{}' is not implemented yet", operation)
            }
        }
    }
}

impl<F: EngineFactory> RegionEditor<F> {
    /// Pause if playing, otherwise play from the current position
    pub fn toggle_play(&mut self) {
        let Some((engine, session, _)) = self.ready_parts() else {
            debug!("[TRANSPORT] toggle_play ignored: engine not ready");
            return;
        };

        if session.is_playing() {
            engine.pause();
        } else {
            engine.play(None);
        }
        session.set_playing(!session.is_playing());
        debug!("[TRANSPORT] Playing: {}", session.is_playing());
    }

    /// Skip by the engine's configured increment; the playing flag is kept
    pub fn skip(&mut self, direction: SkipDirection) {
        let Some((engine, _, _)) = self.ready_parts() else {
            debug!("[TRANSPORT] skip ignored: engine not ready");
            return;
        };

        match direction {
            SkipDirection::Forward => engine.skip_forward(),
            SkipDirection::Backward => engine.skip_backward(),
        }
    }

    /// Jump to the start or end of the track
    ///
    /// `End` skips to `jump_end_lead_secs` before the end, pauses and then
    /// nudges forward by one skip increment; playback always ends up
    /// stopped. `Start` stops the engine and resumes only if the session
    /// was playing.
    pub fn jump(&mut self, target: JumpTarget) {
        let Some((engine, session, config)) = self.ready_parts() else {
            debug!("[TRANSPORT] jump ignored: engine not ready");
            return;
        };

        match target {
            JumpTarget::End => {
                let offset = engine.duration() - engine.current_time() - config.jump_end_lead_secs;
                engine.skip(offset);
                engine.pause();
                engine.skip_forward();
                session.set_playing(false);
                debug!("[TRANSPORT] Jumped to end (offset {:.3}s)", offset);
            }
            JumpTarget::Start => {
                engine.stop();
                if session.is_playing() {
                    engine.play(None);
                }
                debug!("[TRANSPORT] Jumped to start");
            }
        }
    }

    /// Throw away all region edits and stop
    pub fn cancel(&mut self) {
        let Some((engine, session, config)) = self.ready_parts() else {
            debug!("[TRANSPORT] cancel ignored: engine not ready");
            return;
        };

        let bounds = session.reset_to_original();
        recreate_region(engine, bounds, config.region_color);
        engine.stop();
        info!("[TRANSPORT] Region edits cancelled, restored {}", bounds);
    }

    /// Cut the track to the region
    ///
    /// Trimming is not available; this only reports so.
    pub fn cut(&self) -> Notice {
        warn!("[TRANSPORT] Cut requested but not implemented");
        Notice::NotImplemented {
            operation: "cut".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::engine::{EngineCall, MockEngineFactory, RegionBounds};
    use pretty_assertions::assert_eq;

    fn ready_editor(duration: f64) -> RegionEditor<MockEngineFactory> {
        let mut editor = RegionEditor::new(MockEngineFactory::new(duration), EditorConfig::default());
        editor.initialize(&[]).unwrap();
        editor.pump_events();
        editor.engine_mut().unwrap().clear_calls();
        editor
    }

    #[test]
    fn test_toggle_play() {
        let mut editor = ready_editor(60.0);
        editor.toggle_play();
        assert!(editor.snapshot().is_playing);
        editor.toggle_play();
        assert!(!editor.snapshot().is_playing);
        assert_eq!(
            editor.engine().unwrap().calls(),
            &[EngineCall::Play { from: None }, EngineCall::Pause]
        );
    }

    #[test]
    fn test_skip_keeps_playing_flag() {
        let mut editor = ready_editor(60.0);
        editor.toggle_play();
        editor.skip(SkipDirection::Forward);
        editor.skip(SkipDirection::Forward);
        editor.skip(SkipDirection::Backward);

        assert!(editor.snapshot().is_playing);
        let engine = editor.engine().unwrap();
        assert_eq!(engine.current_time(), 5.0);
        assert_eq!(
            &engine.calls()[1..],
            &[
                EngineCall::SkipForward,
                EngineCall::SkipForward,
                EngineCall::SkipBackward
            ]
        );
    }

    #[test]
    fn test_jump_to_end_sequence() {
        let mut editor = ready_editor(60.0);
        editor.toggle_play();
        editor.engine_mut().unwrap().set_current_time(10.0);
        editor.engine_mut().unwrap().clear_calls();

        editor.jump(JumpTarget::End);

        assert!(!editor.snapshot().is_playing);
        let engine = editor.engine().unwrap();
        assert_eq!(
            engine.calls(),
            &[
                EngineCall::Skip { offset: 45.0 },
                EngineCall::Pause,
                EngineCall::SkipForward
            ]
        );
        assert_eq!(engine.current_time(), 60.0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_jump_to_start_while_paused_stays_paused() {
        let mut editor = ready_editor(60.0);
        editor.jump(JumpTarget::Start);
        assert_eq!(editor.engine().unwrap().calls(), &[EngineCall::Stop]);
        assert!(!editor.snapshot().is_playing);
    }

    #[test]
    fn test_jump_to_start_while_playing_resumes() {
        let mut editor = ready_editor(60.0);
        editor.toggle_play();
        editor.engine_mut().unwrap().set_current_time(33.0);
        editor.engine_mut().unwrap().clear_calls();

        editor.jump(JumpTarget::Start);

        let engine = editor.engine().unwrap();
        assert_eq!(engine.calls(), &[EngineCall::Stop, EngineCall::Play { from: None }]);
        assert_eq!(engine.current_time(), 0.0);
        assert!(editor.snapshot().is_playing);
    }

    #[test]
    fn test_cancel_restores_original_region() {
        let mut editor = ready_editor(60.0);
        editor
            .engine_mut()
            .unwrap()
            .drag_and_release(RegionBounds::new(20.0, 25.0));
        editor.pump_events();
        editor.engine_mut().unwrap().clear_calls();

        editor.cancel();

        let snapshot = editor.snapshot();
        assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
        assert!(!snapshot.is_playing);
        assert!(!snapshot.was_region_changed);
        assert_eq!(
            editor.engine().unwrap().calls(),
            &[
                EngineCall::ClearRegions,
                EngineCall::AddRegion {
                    bounds: RegionBounds::new(20.0, 40.0)
                },
                EngineCall::Stop
            ]
        );
    }

    #[test]
    fn test_intents_before_ready_are_no_ops() {
        let mut editor =
            RegionEditor::new(MockEngineFactory::deferred(60.0), EditorConfig::default());
        editor.initialize(&[]).unwrap();
        editor.engine_mut().unwrap().clear_calls();
        let before = editor.snapshot();

        editor.toggle_play();
        editor.skip(SkipDirection::Forward);
        editor.jump(JumpTarget::End);
        editor.jump(JumpTarget::Start);
        editor.cancel();

        assert_eq!(editor.snapshot(), before);
        assert!(editor.engine().unwrap().calls().is_empty());
    }

    #[test]
    fn test_cut_reports_not_implemented() {
        let editor = ready_editor(60.0);
        let before = editor.snapshot();
        let notice = editor.cut();

        assert_eq!(
            notice,
            Notice::NotImplemented {
                operation: "cut".to_string()
            }
        );
        assert_eq!(notice.to_string(), "'cut' is not implemented yet");
        assert_eq!(editor.snapshot(), before);
    }
}
