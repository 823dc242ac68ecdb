//! numbers-station audio core
//!
//! Joins PCM WAV samples into a single track with digital silence between
//! them. This is the engine behind `numstation concat`.
//!
//! # Guarantees
//!
//! - Every input must share one [`WavFormat`] (channels, sample width, frame
//!   rate). The check runs over headers only, before any frame data is read.
//! - Frame data is copied verbatim, in input order. No resampling, bit-depth
//!   conversion or mixing happens anywhere in this crate.
//! - The output header is sized from the bytes actually written.
//! - Either a complete WAV stream reaches the sink or nothing does.
//!
//! # Example
//!
//! ```ignore
//! use numstation_audio::{concatenate_files, FileSink};
//!
//! let mut sink = FileSink::new("out.wav");
//! let report = concatenate_files(&["samples/1.wav", "samples/7.wav"], 0.5, &mut sink)?;
//! println!("{} frames at {}", report.total_frames, report.format);
//! ```
//!
//! # Crate Structure
//!
//! - [`concat`] - The concatenator and its report
//! - [`format`] - Format triple
//! - [`reader`] - RIFF/WAVE header parsing
//! - [`writer`] - WAV stream writer
//! - [`silence`] - Silence buffer generation
//! - [`sink`] - File, buffer and stdout destinations
//! - [`selection`] - Glob expansion and seeded sample choice

pub mod concat;
pub mod error;
pub mod format;
pub mod reader;
pub mod selection;
pub mod silence;
pub mod sink;
pub mod writer;

pub use concat::{concatenate_files, concatenate_to_vec, ConcatReport, Concatenator, SampleFile};
pub use error::{WavError, WavResult};
pub use format::WavFormat;
pub use reader::{read_format, WavReader};
pub use sink::{sink_for, BufferSink, FileSink, OutputSink, StdoutSink};
pub use writer::WavWriter;
