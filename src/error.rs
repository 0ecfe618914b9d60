//! Error handling for Wavecrop
//!
//! Transport intents never fail: an engine that is not ready turns them into
//! no-ops. Errors only surface at the edges, when audio bytes are decoded,
//! when configuration is loaded, or when a CLI script is parsed.

use thiserror::Error;

/// Result type alias for Wavecrop operations
pub type Result<T> = std::result::Result<T, CropError>;

/// Main error type for Wavecrop operations
#[derive(Error, Debug)]
pub enum CropError {
    // Audio Errors
    #[error("Invalid audio: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Region Errors
    #[error("Invalid region: [{start:.3}s, {end:.3}s]")]
    InvalidRegion { start: f64, end: f64 },

    // Engine Errors
    #[error("Rendering engine has been destroyed")]
    EngineDestroyed,

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Script Errors
    #[error("Invalid intent: '{input}'")]
    InvalidIntent { input: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CropError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CropError::InvalidAudio { .. } => "INVALID_AUDIO",
            CropError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            CropError::EmptyAudio => "EMPTY_AUDIO",
            CropError::InvalidRegion { .. } => "INVALID_REGION",
            CropError::EngineDestroyed => "ENGINE_DESTROYED",
            CropError::InvalidConfig { .. } => "INVALID_CONFIG",
            CropError::InvalidIntent { .. } => "INVALID_INTENT",
            CropError::Io(_) => "IO_ERROR",
            CropError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by retrying with different input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CropError::InvalidAudio { .. }
                | CropError::UnsupportedFormat { .. }
                | CropError::InvalidRegion { .. }
                | CropError::InvalidConfig { .. }
                | CropError::InvalidIntent { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            CropError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "Try converting the file to WAV format first",
            ],
            CropError::UnsupportedFormat { .. } => vec![
                "Convert to 8, 16, 24 or 32-bit PCM, or 32-bit float WAV",
            ],
            CropError::EmptyAudio => vec!["Choose a track that contains audio"],
            CropError::EngineDestroyed => vec!["Load the track again to create a new engine"],
            CropError::InvalidConfig { .. } => vec![
                "Margins and tolerances must be finite and non-negative",
                "The margin threshold must be at least twice the margin",
            ],
            CropError::InvalidIntent { .. } => vec![
                "Valid steps: toggle, skip+, skip-, jump-start, jump-end, cancel, cut",
                "Drag steps take two times: drag:<start>:<end>, drag-live:<start>:<end>",
                "Waiting takes seconds: wait:<secs>",
            ],
            _ => vec![],
        }
    }
}
