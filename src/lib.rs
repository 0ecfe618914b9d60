//! Wavecrop - Crop-Region Editing Over a Waveform
//!
//! Wavecrop lets a user select, preview and adjust a sub-range of an audio
//! track against its waveform, with drag handles and transport controls.
//!
//! # Architecture
//!
//! - [`engine`]: the rendering/playback engine contract, plus a headless
//!   WAV engine and a mock engine
//! - [`editor`]: the region editor, which owns the engine of the current
//!   track and reconciles its events with the session state
//! - [`config`]: region policy and engine settings
//! - [`cli`]: command-line front end over the headless engine

pub mod cli;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;

pub use config::EditorConfig;
pub use editor::{RegionEditor, Snapshot};
pub use error::{CropError, Result};
