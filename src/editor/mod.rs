//! Region Editor / Transport Controller
//!
//! [`RegionEditor`] owns the engine of the current track and the
//! [`SessionState`]. It is split by concern:
//! - `lifecycle` - bringing the engine up, the default region, teardown
//! - `reconcile` - region events while the user drags handles
//! - `transport` - play/pause, skips, jumps, cancel and cut
//!
//! Everything runs on one thread. Engine events are queued by the engine
//! and dispatched by [`RegionEditor::pump_events`], one at a time, each to
//! completion.

mod lifecycle;
mod reconcile;
mod session;
mod transport;

use log::debug;
use serde::Serialize;

use crate::config::EditorConfig;
use crate::engine::{EngineEvent, EngineFactory, RegionBounds, RegionColor, RenderingEngine};

pub use lifecycle::default_region;
pub use session::{Reaction, SessionState, Transition};
pub use transport::{JumpTarget, Notice, SkipDirection};

/// Where the engine of the current track is in its life
#[derive(Debug)]
enum EngineSlot<E> {
    /// No track handed over
    Empty,
    /// Created and loading; waiting for the ready event
    Loading(E),
    /// Ready, with the region shown
    Ready(E),
}

impl<E> Default for EngineSlot<E> {
    fn default() -> Self {
        EngineSlot::Empty
    }
}

impl<E> EngineSlot<E> {
    fn engine(&self) -> Option<&E> {
        match self {
            EngineSlot::Loading(engine) | EngineSlot::Ready(engine) => Some(engine),
            EngineSlot::Empty => None,
        }
    }

    fn engine_mut(&mut self) -> Option<&mut E> {
        match self {
            EngineSlot::Loading(engine) | EngineSlot::Ready(engine) => Some(engine),
            EngineSlot::Empty => None,
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, EngineSlot::Ready(_))
    }
}

/// Read-only view of the session for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub is_playing: bool,
    pub cut_start: f64,
    pub cut_end: f64,
    pub was_region_changed: bool,
    pub is_loading: bool,
}

/// Crop-region editor bound to one track at a time
///
/// # Example
/// ```
/// use wavecrop::config::EditorConfig;
/// use wavecrop::editor::RegionEditor;
/// use wavecrop::engine::MockEngineFactory;
///
/// let mut editor = RegionEditor::new(MockEngineFactory::new(60.0), EditorConfig::default());
/// editor.initialize(&[]).unwrap();
/// editor.pump_events();
///
/// let snapshot = editor.snapshot();
/// assert!(!snapshot.is_loading);
/// assert_eq!((snapshot.cut_start, snapshot.cut_end), (20.0, 40.0));
/// ```
pub struct RegionEditor<F: EngineFactory> {
    factory: F,
    config: EditorConfig,
    slot: EngineSlot<F::Engine>,
    session: SessionState,
}

impl<F: EngineFactory> RegionEditor<F> {
    pub fn new(factory: F, config: EditorConfig) -> Self {
        Self {
            factory,
            config,
            slot: EngineSlot::Empty,
            session: SessionState::new(),
        }
    }

    /// Dispatch one engine event
    pub fn handle_event(&mut self, event: EngineEvent) {
        debug!("[EDITOR] Event {:?}", event);
        match event {
            EngineEvent::Ready => self.on_ready(),
            EngineEvent::RegionCreated { id } => self.on_region_created(id),
            EngineEvent::RegionUpdated { id, bounds } => self.on_region_updated(id, bounds),
            EngineEvent::RegionUpdateEnd { id, bounds } => self.on_region_update_end(id, bounds),
        }
    }

    /// Drain the engine's queue until no events are left
    ///
    /// Events raised while handling an event are handled in the same call.
    /// Returns the number of events handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let events = match self.slot.engine_mut() {
                Some(engine) => engine.take_events(),
                None => break,
            };
            if events.is_empty() {
                break;
            }
            for event in events {
                self.handle_event(event);
                handled += 1;
            }
        }
        handled
    }

    /// Let wall-clock time pass on the engine's transport
    ///
    /// The session's playing flag is not touched: it follows intents, not
    /// the engine reaching the end of the track.
    pub fn advance(&mut self, secs: f64) {
        if let Some(engine) = self.slot.engine_mut() {
            engine.advance(secs);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let cut = self.session.cut();
        Snapshot {
            is_playing: self.session.is_playing(),
            cut_start: cut.start,
            cut_end: cut.end,
            was_region_changed: self.session.was_region_changed(),
            is_loading: !self.slot.is_ready(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    /// Engine of the current track, loading or ready
    pub fn engine(&self) -> Option<&F::Engine> {
        self.slot.engine()
    }

    pub fn engine_mut(&mut self) -> Option<&mut F::Engine> {
        self.slot.engine_mut()
    }

    /// Engine, session and config of a ready editor, borrowed together
    fn ready_parts(&mut self) -> Option<(&mut F::Engine, &mut SessionState, &EditorConfig)> {
        match &mut self.slot {
            EngineSlot::Ready(engine) => Some((engine, &mut self.session, &self.config)),
            _ => None,
        }
    }
}

impl<F: EngineFactory> Drop for RegionEditor<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Replace whatever regions the engine holds with a single one
///
/// The engine cannot move a region in place, so this always goes through
/// clear + add.
fn recreate_region<E: RenderingEngine>(engine: &mut E, bounds: RegionBounds, color: RegionColor) {
    engine.clear_regions();
    engine.add_region(bounds, color);
}

/// Carry out a session reaction on the engine
fn react<E: RenderingEngine>(engine: &mut E, reaction: Reaction, color: RegionColor) {
    match reaction {
        Reaction::None => {}
        Reaction::ShowRegion { bounds } => {
            engine.add_region(bounds, color);
        }
        Reaction::RecreateRegion {
            bounds,
            resume_from,
        } => {
            recreate_region(engine, bounds, color);
            if let Some(position) = resume_from {
                engine.play(Some(position));
            }
        }
        Reaction::PlayFrom { anchor } => engine.play(Some(anchor)),
    }
}
