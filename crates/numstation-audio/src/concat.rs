//! WAV concatenation with silence gaps.
//!
//! A run has three phases:
//!
//! 1. Header pass: every input is opened, its format read and compared with
//!    the first input, then closed. Nothing else is read.
//! 2. Frame pass: each input's frames are appended to a [`WavWriter`] in order,
//!    with the silence buffer between consecutive inputs.
//! 3. Commit: the finished stream is written to the sink and committed.
//!
//! An error in any phase aborts before the sink sees a single byte.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{WavError, WavResult};
use crate::format::WavFormat;
use crate::reader::WavReader;
use crate::silence::{generate_silence, validate_duration};
use crate::sink::{BufferSink, OutputSink};
use crate::writer::WavWriter;

/// Reader over either a file or an in-memory buffer.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// A WAV input to concatenate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleFile {
    /// WAV file on disk.
    Path(PathBuf),
    /// WAV bytes held in memory, named for error messages.
    Memory {
        /// Label used in errors and reports.
        name: String,
        /// Complete WAV stream.
        bytes: Vec<u8>,
    },
}

impl SampleFile {
    /// Creates an in-memory sample.
    pub fn memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes,
        }
    }

    /// Path or label identifying this sample.
    pub fn label(&self) -> PathBuf {
        match self {
            SampleFile::Path(path) => path.clone(),
            SampleFile::Memory { name, .. } => PathBuf::from(name),
        }
    }

    /// Opens the sample and parses its header.
    pub fn open(&self) -> WavResult<WavReader<Box<dyn ReadSeek + '_>>> {
        match self {
            SampleFile::Path(path) => {
                let file = File::open(path).map_err(|e| WavError::read(path, e))?;
                let boxed: Box<dyn ReadSeek + '_> = Box::new(BufReader::new(file));
                WavReader::new(boxed, path.clone())
            }
            SampleFile::Memory { name, bytes } => {
                let cursor: Box<dyn ReadSeek + '_> = Box::new(Cursor::new(bytes.as_slice()));
                WavReader::new(cursor, name)
            }
        }
    }
}

impl From<PathBuf> for SampleFile {
    fn from(path: PathBuf) -> Self {
        SampleFile::Path(path)
    }
}

impl From<&Path> for SampleFile {
    fn from(path: &Path) -> Self {
        SampleFile::Path(path.to_path_buf())
    }
}

impl fmt::Display for SampleFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().display())
    }
}

/// Summary of a finished concatenation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatReport {
    /// Format shared by every input and the output.
    pub format: WavFormat,
    /// Number of inputs joined.
    pub inputs: usize,
    /// Frames of silence inserted per gap.
    pub silence_frames: usize,
    /// Total frames in the output `data` chunk.
    pub total_frames: usize,
}

impl ConcatReport {
    /// Output duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.format.duration_secs(self.total_frames)
    }
}

/// Joins WAV inputs with a fixed silence gap.
#[derive(Debug, Clone, Copy)]
pub struct Concatenator {
    silence_secs: f64,
}

impl Concatenator {
    /// Creates a concatenator inserting `silence_secs` between inputs.
    pub fn new(silence_secs: f64) -> WavResult<Self> {
        validate_duration(silence_secs)?;
        Ok(Self { silence_secs })
    }

    /// Silence inserted between inputs, in seconds.
    pub fn silence_secs(&self) -> f64 {
        self.silence_secs
    }

    /// Checks that every sample shares the first sample's format.
    pub fn check_formats(&self, samples: &[SampleFile]) -> WavResult<WavFormat> {
        let (first, rest) = samples
            .split_first()
            .ok_or_else(|| WavError::invalid_argument("no sample files to concatenate"))?;

        let expected = first.open()?.format();
        for sample in rest {
            let found = sample.open()?.format();
            if found != expected {
                return Err(WavError::FormatMismatch {
                    path: sample.label(),
                    expected,
                    found,
                });
            }
        }
        Ok(expected)
    }

    /// Assembles the output stream in memory without writing it anywhere.
    pub fn render(&self, samples: &[SampleFile]) -> WavResult<(WavWriter, ConcatReport)> {
        let format = self.check_formats(samples)?;
        let silence = generate_silence(&format, self.silence_secs)?;

        let mut writer = WavWriter::new(format);
        let last = samples.len() - 1;
        for (index, sample) in samples.iter().enumerate() {
            let frames = sample.open()?.read_frames()?;
            writer.write_frames(&frames);
            if index != last {
                writer.write_frames(&silence);
            }
        }

        let report = ConcatReport {
            format,
            inputs: samples.len(),
            silence_frames: format.frames_in(silence.len()),
            total_frames: writer.frames_written(),
        };
        Ok((writer, report))
    }

    /// Concatenates `samples` into `sink`.
    pub fn concatenate(
        &self,
        samples: &[SampleFile],
        sink: &mut dyn OutputSink,
    ) -> WavResult<ConcatReport> {
        let (writer, report) = self.render(samples)?;
        let bytes = writer.finish()?;
        sink.write_bytes(&bytes)?;
        sink.commit()?;
        Ok(report)
    }
}

/// Concatenates WAV files on disk into `sink`.
pub fn concatenate_files<P: AsRef<Path>>(
    paths: &[P],
    silence_secs: f64,
    sink: &mut dyn OutputSink,
) -> WavResult<ConcatReport> {
    let samples: Vec<SampleFile> = paths.iter().map(|p| SampleFile::from(p.as_ref())).collect();
    Concatenator::new(silence_secs)?.concatenate(&samples, sink)
}

/// Concatenates samples into a new WAV byte vector.
pub fn concatenate_to_vec(
    samples: &[SampleFile],
    silence_secs: f64,
) -> WavResult<(Vec<u8>, ConcatReport)> {
    let mut sink = BufferSink::new();
    let report = Concatenator::new(silence_secs)?.concatenate(samples, &mut sink)?;
    Ok((sink.into_inner(), report))
}
