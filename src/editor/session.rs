//! Session state of one loaded track
//!
//! Engine events are applied here as named [`Transition`]s. Each transition
//! mutates the state and returns the [`Reaction`] the editor must carry out
//! on the engine, so the region rules can be exercised without an engine.

use serde::Serialize;

use crate::engine::RegionBounds;

/// Engine-driven changes to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The engine finished loading; `bounds` is the default region
    Ready { bounds: RegionBounds },
    /// A region handle is being dragged
    RegionUpdated { bounds: RegionBounds },
    /// A region handle was released
    RegionCommitted { bounds: RegionBounds },
}

/// What the engine has to do after a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    None,
    /// Add the first region
    ShowRegion { bounds: RegionBounds },
    /// Clear all regions, add one at `bounds`, and play from `resume_from`
    RecreateRegion {
        bounds: RegionBounds,
        resume_from: Option<f64>,
    },
    /// Start playback from the anchor point
    PlayFrom { anchor: f64 },
}

/// Mutable state of the editor for one track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SessionState {
    is_playing: bool,
    cut: RegionBounds,
    original: RegionBounds,
    was_region_changed: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an engine transition
    ///
    /// `collision_tolerance` is the handle distance at or below which a drag
    /// is considered degenerate.
    pub fn apply(&mut self, transition: Transition, collision_tolerance: f64) -> Reaction {
        match transition {
            Transition::Ready { bounds } => {
                self.cut = bounds;
                self.original = bounds;
                self.is_playing = false;
                self.was_region_changed = false;
                Reaction::ShowRegion { bounds }
            }
            Transition::RegionUpdated { bounds } => {
                if !bounds.is_collapsed(collision_tolerance) {
                    return Reaction::None;
                }
                self.restore_committed()
            }
            Transition::RegionCommitted { bounds } => {
                if bounds.is_collapsed(collision_tolerance) {
                    return self.restore_committed();
                }
                let mut anchor = 0.0;
                if bounds.end != self.cut.end {
                    self.cut.end = bounds.end;
                    anchor = bounds.end;
                }
                if bounds.start != self.cut.start {
                    self.cut.start = bounds.start;
                    anchor = bounds.start;
                }
                self.is_playing = true;
                // An edge committed at exactly 0 reads as "nothing moved"
                self.was_region_changed = anchor != 0.0;
                Reaction::PlayFrom { anchor }
            }
        }
    }

    /// Discard an in-progress drag and put back the last committed region
    ///
    /// Playback resumes from the committed start if the session was playing.
    pub fn restore_committed(&self) -> Reaction {
        Reaction::RecreateRegion {
            bounds: self.cut,
            resume_from: self.is_playing.then_some(self.cut.start),
        }
    }

    /// Put the current bounds back to the originals and stop
    ///
    /// Returns the restored bounds.
    pub fn reset_to_original(&mut self) -> RegionBounds {
        self.cut = self.original;
        self.is_playing = false;
        self.was_region_changed = false;
        self.cut
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Current (committed) region bounds
    pub fn cut(&self) -> RegionBounds {
        self.cut
    }

    /// Bounds captured when the engine became ready
    pub fn original(&self) -> RegionBounds {
        self.original
    }

    pub fn was_region_changed(&self) -> bool {
        self.was_region_changed
    }
}
