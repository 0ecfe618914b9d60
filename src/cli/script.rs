//! Scripted sessions
//!
//! A script is a list of steps, each one user intent or gesture, run in
//! order against an editor. Steps are written as short words:
//! `toggle`, `skip+`, `skip-`, `jump-start`, `jump-end`, `cancel`, `cut`,
//! `drag:<start>:<end>`, `drag-live:<start>:<end>`, `wait:<secs>`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::editor::{JumpTarget, Notice, RegionEditor, SkipDirection, Snapshot};
use crate::engine::{HeadlessEngineFactory, RegionBounds, RenderingEngine};
use crate::error::CropError;

/// One scripted intent or gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Toggle,
    Skip(SkipDirection),
    Jump(JumpTarget),
    /// Drag the region's handles to the bounds and release
    Drag(RegionBounds),
    /// Drag the region's handles to the bounds without releasing
    DragLive(RegionBounds),
    Cancel,
    Cut,
    /// Let wall-clock seconds pass
    Wait(f64),
}

impl FromStr for Step {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CropError::InvalidIntent {
            input: s.to_string(),
        };

        let mut parts = s.trim().split(':');
        let word = parts.next().unwrap_or_default();
        let args = parts
            .map(|p| p.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<f64>, _>>()?;

        let step = match (word, args.as_slice()) {
            ("toggle", []) => Step::Toggle,
            ("skip+", []) => Step::Skip(SkipDirection::Forward),
            ("skip-", []) => Step::Skip(SkipDirection::Backward),
            ("jump-start", []) => Step::Jump(JumpTarget::Start),
            ("jump-end", []) => Step::Jump(JumpTarget::End),
            ("cancel", []) => Step::Cancel,
            ("cut", []) => Step::Cut,
            ("drag", [start, end]) => Step::Drag(RegionBounds::new(*start, *end)),
            ("drag-live", [start, end]) => Step::DragLive(RegionBounds::new(*start, *end)),
            ("wait", [secs]) if secs.is_finite() && *secs >= 0.0 => Step::Wait(*secs),
            _ => return Err(invalid()),
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Toggle => write!(f, "toggle"),
            Step::Skip(SkipDirection::Forward) => write!(f, "skip+"),
            Step::Skip(SkipDirection::Backward) => write!(f, "skip-"),
            Step::Jump(JumpTarget::Start) => write!(f, "jump-start"),
            Step::Jump(JumpTarget::End) => write!(f, "jump-end"),
            Step::Drag(b) => write!(f, "drag:{}:{}", b.start, b.end),
            Step::DragLive(b) => write!(f, "drag-live:{}:{}", b.start, b.end),
            Step::Cancel => write!(f, "cancel"),
            Step::Cut => write!(f, "cut"),
            Step::Wait(secs) => write!(f, "wait:{}", secs),
        }
    }
}

/// State after one step, as printed by `wavecrop-cli run`
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub snapshot: Snapshot,
    pub playhead: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Parse every step up front so a typo fails before anything runs
pub fn parse_steps<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Step>, CropError> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

/// Run one step against a ready headless editor and report the result
pub fn run_step(editor: &mut RegionEditor<HeadlessEngineFactory>, step: Step) -> StepReport {
    let mut notice = None;

    match step {
        Step::Toggle => editor.toggle_play(),
        Step::Skip(direction) => editor.skip(direction),
        Step::Jump(target) => editor.jump(target),
        Step::Cancel => editor.cancel(),
        Step::Cut => notice = Some(editor.cut()),
        Step::Wait(secs) => editor.advance(secs),
        Step::Drag(bounds) | Step::DragLive(bounds) => {
            if let Some(engine) = editor.engine_mut() {
                if let Some(id) = engine.regions().first().map(|r| r.id) {
                    engine.drag_region(id, bounds);
                    if matches!(step, Step::Drag(_)) {
                        engine.release_region(id);
                    }
                }
            }
        }
    }
    editor.pump_events();

    StepReport {
        step: step.to_string(),
        snapshot: editor.snapshot(),
        playhead: editor.engine().map(|e| e.current_time()).unwrap_or_default(),
        notice,
    }
}
