//! CLI Module
//!
//! Command-line front end over the headless engine: inspect a track, print
//! its waveform envelope, or run a scripted editing session.

pub mod commands;
pub mod script;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wavecrop - preview and adjust a crop region of an audio track
#[derive(Parser, Debug)]
#[command(name = "wavecrop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show duration and default region of a WAV file
    #[command(name = "inspect")]
    Inspect {
        /// Input WAV file
        input: PathBuf,
    },

    /// Print the waveform envelope as JSON
    #[command(name = "peaks")]
    Peaks {
        /// Input WAV file
        input: PathBuf,

        /// Number of columns
        #[arg(short, long, default_value_t = 64)]
        buckets: usize,
    },

    /// Run editing steps and print the state after each as JSON lines
    #[command(name = "run")]
    Run {
        /// Input WAV file
        input: PathBuf,

        /// Steps: toggle, skip+, skip-, jump-start, jump-end, cancel, cut,
        /// drag:<start>:<end>, drag-live:<start>:<end>, wait:<secs>
        #[arg(required = true, allow_hyphen_values = true)]
        steps: Vec<String>,
    },
}
