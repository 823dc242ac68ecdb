//! numbers-station Encoder Backend
//!
//! Transcodes a finished WAV stream to Opus in an Ogg container by running
//! ffmpeg as a one-shot subprocess. The WAV bytes are only read, never
//! modified, so a failed encode leaves the caller's audio intact.
//!
//! # ffmpeg Requirements
//!
//! The encoder looks for ffmpeg in:
//!
//! 1. The path given in [`EncoderConfig`]
//! 2. The `NUMSTATION_FFMPEG` environment variable
//! 3. System PATH
//!
//! ffmpeg must be built with `libopus`.
//!
//! # Example
//!
//! ```ignore
//! use numstation_encoder::{EncodeRequest, Encoder, OpusSettings, OutputTarget};
//!
//! let request = EncodeRequest {
//!     wav,
//!     settings: OpusSettings::for_channels(1),
//!     target: OutputTarget::from_arg("station.ogg"),
//! };
//! let report = Encoder::new().encode(&request)?;
//! println!("encoded at {} bps", report.bitrate);
//! ```

pub mod encoder;
pub mod error;

pub use encoder::{
    build_args, opus_bitrate, resolve_ffmpeg, EncodeReport, EncodeRequest, Encoder, EncoderConfig,
    OpusSettings, OutputTarget, DEFAULT_TIMEOUT_SECS, FFMPEG_ENV, STEREO_BITRATE,
};
pub use error::{EncoderError, EncoderResult};
