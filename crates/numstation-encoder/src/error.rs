//! Error types for the encoder backend.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for encoder operations.
pub type EncoderResult<T> = Result<T, EncoderError>;

/// Errors that can occur while transcoding with ffmpeg.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// ffmpeg executable not found.
    #[error("ffmpeg executable not found. Install ffmpeg and ensure it is in PATH, or set NUMSTATION_FFMPEG")]
    FfmpegNotFound,

    /// Configured ffmpeg path does not exist.
    #[error("configured ffmpeg not found at: {}", path.display())]
    ConfiguredPathMissing { path: PathBuf },

    /// Failed to spawn ffmpeg.
    #[error("failed to spawn ffmpeg: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Failed to feed WAV data to ffmpeg's stdin.
    #[error("failed to write audio to ffmpeg: {0}")]
    StdinFailed(#[source] std::io::Error),

    /// ffmpeg timed out.
    #[error("ffmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// ffmpeg exited with non-zero status.
    #[error("ffmpeg exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to stage or move the encoded output into place.
    #[error("failed to write encoded output: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// Request rejected before spawning.
    #[error("invalid encode request: {message}")]
    InvalidRequest { message: String },
}

impl EncoderError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Stable error code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            EncoderError::FfmpegNotFound => "ENCODER_001",
            EncoderError::ConfiguredPathMissing { .. } => "ENCODER_002",
            EncoderError::SpawnFailed(_) => "ENCODER_003",
            EncoderError::StdinFailed(_) => "ENCODER_004",
            EncoderError::Timeout { .. } => "ENCODER_005",
            EncoderError::ProcessFailed { .. } => "ENCODER_006",
            EncoderError::OutputFailed(_) => "ENCODER_007",
            EncoderError::InvalidRequest { .. } => "ENCODER_008",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        "encoder"
    }
}
