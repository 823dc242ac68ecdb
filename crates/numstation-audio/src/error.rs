//! Error types for the WAV core.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::WavFormat;

/// Result type for WAV operations.
pub type WavResult<T> = Result<T, WavError>;

/// Errors that can occur while reading, checking or concatenating WAV files.
#[derive(Debug, Error)]
pub enum WavError {
    /// A later input does not share the first input's format.
    #[error("parameters mismatch in '{}': expected {expected}, found {found}", path.display())]
    FormatMismatch {
        /// The offending file.
        path: PathBuf,
        /// Format of the first input.
        expected: WavFormat,
        /// Format of the offending input.
        found: WavFormat,
    },

    /// The file could not be opened or read.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// The unreadable file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a PCM WAV container this reader understands.
    #[error("invalid WAV '{}': {message}", path.display())]
    InvalidWav {
        /// The file being parsed.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A caller-supplied argument was rejected before any I/O.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// Glob pattern could not be parsed.
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        /// The rejected pattern.
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WavError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid WAV error.
    pub fn invalid_wav(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidWav {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Stable error code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            WavError::FormatMismatch { .. } => "WAV_001",
            WavError::Read { .. } => "WAV_002",
            WavError::InvalidWav { .. } => "WAV_003",
            WavError::InvalidArgument { .. } => "WAV_004",
            WavError::Pattern { .. } => "WAV_005",
            WavError::Io(_) => "WAV_006",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        "wav"
    }

    /// Returns true for errors caused by unreadable or malformed input files.
    pub fn is_read_error(&self) -> bool {
        matches!(self, WavError::Read { .. } | WavError::InvalidWav { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mismatch_names_file() {
        let err = WavError::FormatMismatch {
            path: PathBuf::from("samples/7.wav"),
            expected: WavFormat::new(1, 2, 8000),
            found: WavFormat::new(2, 2, 8000),
        };
        let msg = err.to_string();
        assert!(msg.contains("samples/7.wav"));
        assert!(msg.contains("1 ch"));
        assert!(msg.contains("2 ch"));
        assert_eq!(err.code(), "WAV_001");
    }

    #[test]
    fn test_read_error_classification() {
        let err = WavError::read(
            "missing.wav",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(err.is_read_error());
        assert!(err.to_string().contains("missing.wav"));

        let err = WavError::invalid_argument("no samples");
        assert!(!err.is_read_error());
        assert_eq!(err.category(), "wav");
    }
}
