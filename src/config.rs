//! Editor configuration
//!
//! Region policy constants and the engine construction parameters. Every
//! field has a default, so a JSON file only needs the keys it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, RegionColor};
use crate::error::{CropError, Result};

/// Margin kept off each end of a long track by the default region
pub const DEFAULT_MARGIN_SECS: f64 = 20.0;

/// Tracks longer than this get a margined default region
pub const DEFAULT_MARGIN_THRESHOLD_SECS: f64 = 40.0;

/// Handles closer than this are treated as collided
pub const DEFAULT_COLLISION_TOLERANCE_SECS: f64 = 0.25;

/// Distance from the end `jump(End)` skips to before its final nudge
pub const DEFAULT_JUMP_END_LEAD_SECS: f64 = 5.0;

/// Settings of a [`crate::editor::RegionEditor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub margin_secs: f64,
    pub margin_threshold_secs: f64,
    pub collision_tolerance_secs: f64,
    pub jump_end_lead_secs: f64,
    pub region_color: RegionColor,
    pub engine: EngineConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            margin_secs: DEFAULT_MARGIN_SECS,
            margin_threshold_secs: DEFAULT_MARGIN_THRESHOLD_SECS,
            collision_tolerance_secs: DEFAULT_COLLISION_TOLERANCE_SECS,
            jump_end_lead_secs: DEFAULT_JUMP_END_LEAD_SECS,
            region_color: RegionColor::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every duration is finite and non-negative, and that a
    /// margined region cannot invert
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("margin_secs", self.margin_secs),
            ("margin_threshold_secs", self.margin_threshold_secs),
            ("collision_tolerance_secs", self.collision_tolerance_secs),
            ("jump_end_lead_secs", self.jump_end_lead_secs),
            ("engine.skip_length", self.engine.skip_length),
        ];

        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(CropError::InvalidConfig {
                    reason: format!("{} must be finite and non-negative, got {}", name, value),
                });
            }
        }

        if self.margin_threshold_secs < 2.0 * self.margin_secs {
            return Err(CropError::InvalidConfig {
                reason: format!(
                    "margin_threshold_secs ({}) must be at least twice margin_secs ({})",
                    self.margin_threshold_secs, self.margin_secs
                ),
            });
        }

        Ok(())
    }
}
