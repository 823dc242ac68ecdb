//! Error types for sample generation.

use std::path::PathBuf;

use numstation_audio::WavError;
use thiserror::Error;

/// Result type for TTS operations.
pub type TtsResult<T> = Result<T, TtsError>;

/// Errors that can occur while synthesizing or writing samples.
#[derive(Debug, Error)]
pub enum TtsError {
    /// No API key or access token configured.
    #[error("no Google Cloud credentials: set GOOGLE_TTS_API_KEY or GOOGLE_OAUTH_ACCESS_TOKEN, or pass --api-key")]
    MissingCredentials,

    /// HTTP transport failure.
    #[error("request to text-to-speech API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("text-to-speech API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The API response did not have the expected shape.
    #[error("unexpected text-to-speech response: {message}")]
    BadResponse { message: String },

    /// `audioContent` was not valid base64.
    #[error("failed to decode audio content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Synthesized audio is not a PCM WAV stream.
    #[error("synthesized audio for '{text}' is not a valid WAV: {source}")]
    InvalidAudio {
        text: String,
        #[source]
        source: WavError,
    },

    /// Number range is empty.
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: i64, end: i64 },

    /// Failed to create the output directory or write a sample.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TtsError {
    /// Creates a bad response error.
    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::BadResponse {
            message: message.into(),
        }
    }

    /// Stable error code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            TtsError::MissingCredentials => "TTS_001",
            TtsError::Http(_) => "TTS_002",
            TtsError::Api { .. } => "TTS_003",
            TtsError::BadResponse { .. } => "TTS_004",
            TtsError::Decode(_) => "TTS_005",
            TtsError::InvalidAudio { .. } => "TTS_006",
            TtsError::InvalidRange { .. } => "TTS_007",
            TtsError::Write { .. } => "TTS_008",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        "tts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = TtsError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("API key not valid"));
        assert_eq!(err.code(), "TTS_003");
    }

    #[test]
    fn test_range_display() {
        let err = TtsError::InvalidRange { start: 10, end: 2 };
        assert!(err.to_string().contains("start 10"));
    }
}
