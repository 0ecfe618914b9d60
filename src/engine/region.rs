//! Waveform regions
//!
//! A region is the highlighted, draggable time range drawn over the
//! waveform. Engines own their regions; the editor only ever refers to them
//! by [`RegionId`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CropError, Result};

/// Opaque identifier of a region inside one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(Uuid);

impl RegionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Start and end of a region in seconds
///
/// Bounds reported by an engine mid-drag may be degenerate (handles crossed
/// or touching), so construction does not validate. Use [`RegionBounds::validated`]
/// where a well-formed range is required.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionBounds {
    pub start: f64,
    pub end: f64,
}

impl RegionBounds {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Distance between the two handles, regardless of their order
    pub fn width(&self) -> f64 {
        (self.end - self.start).abs()
    }

    /// True when the handles are within `tolerance` seconds of each other
    pub fn is_collapsed(&self, tolerance: f64) -> bool {
        self.width() <= tolerance
    }

    /// Check `0 <= start < end <= duration` with finite values
    pub fn validated(self, duration: f64) -> Result<Self> {
        let well_formed = self.start.is_finite()
            && self.end.is_finite()
            && self.start >= 0.0
            && self.start < self.end
            && self.end <= duration;

        if well_formed {
            Ok(self)
        } else {
            Err(CropError::InvalidRegion {
                start: self.start,
                end: self.end,
            })
        }
    }
}

impl fmt::Display for RegionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s]", self.start, self.end)
    }
}

/// RGBA fill colour of a region overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl RegionColor {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for RegionColor {
    /// Translucent black, so the waveform stays readable under the selection
    fn default() -> Self {
        Self::rgba(0, 0, 0, 0.1)
    }
}

impl fmt::Display for RegionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A region as held by an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub bounds: RegionBounds,
    pub color: RegionColor,
    /// Hover label the engine attaches to the region element
    pub label: Option<String>,
}

/// Default hover label engines attach to a region: its duration
pub fn duration_label(bounds: &RegionBounds) -> String {
    format!("{:.2}s", bounds.width())
}

/// Region storage shared by engine implementations
#[derive(Debug, Clone, Default)]
pub struct RegionLayer {
    regions: Vec<Region>,
}

impl RegionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region with the default duration label and return its id
    pub fn add(&mut self, bounds: RegionBounds, color: RegionColor) -> RegionId {
        let id = RegionId::new();
        self.regions.push(Region {
            id,
            bounds,
            color,
            label: Some(duration_label(&bounds)),
        });
        id
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Move a region's handles, as the user does while dragging
    ///
    /// Returns false if the region no longer exists.
    pub fn drag(&mut self, id: RegionId, bounds: RegionBounds) -> bool {
        match self.regions.iter_mut().find(|r| r.id == id) {
            Some(region) => {
                region.bounds = bounds;
                region.label = Some(duration_label(&bounds));
                true
            }
            None => false,
        }
    }

    /// Remove the hover label from a region; no-op for unknown ids
    pub fn strip_label(&mut self, id: RegionId) {
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == id) {
            region.label = None;
        }
    }

    pub fn first(&self) -> Option<&Region> {
        self.regions.first()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
