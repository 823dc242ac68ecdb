//! Output destinations for finished WAV streams.
//!
//! The concatenator only needs to write bytes and then commit them, so every
//! destination implements [`OutputSink`]. File output goes through a temporary
//! file in the target directory and is only renamed into place on commit, so
//! an aborted run never leaves a partial file behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// A writable WAV destination.
pub trait OutputSink {
    /// Writes bytes to the destination.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Makes everything written so far visible at the destination.
    fn commit(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: Vec<u8>,
}

impl BufferSink {
    /// Creates an empty buffer sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the sink, returning its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

impl OutputSink for BufferSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

/// Sink that atomically replaces a file on commit.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    staging: Option<NamedTempFile>,
}

impl FileSink {
    /// Creates a sink targeting `path`. Nothing touches the filesystem until
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            staging: None,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging(&mut self) -> io::Result<&mut NamedTempFile> {
        if self.staging.is_none() {
            let dir = match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let file = tempfile::Builder::new()
                .prefix(".numstation_")
                .suffix(".partial")
                .tempfile_in(dir)?;
            self.staging = Some(file);
        }
        // Populated above
        self.staging
            .as_mut()
            .ok_or_else(|| io::Error::other("staging file unavailable"))
    }
}

impl OutputSink for FileSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.staging()?.write_all(bytes)
    }

    fn commit(&mut self) -> io::Result<()> {
        // Committing with nothing written still produces an empty file
        self.staging()?.flush()?;
        let staging = self
            .staging
            .take()
            .ok_or_else(|| io::Error::other("staging file unavailable"))?;
        staging.as_file().sync_all()?;
        staging.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Sink writing to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Creates a stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for StdoutSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(bytes)
    }

    fn commit(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Picks the sink for an output argument, where `-` means stdout.
pub fn sink_for(output: &str) -> Box<dyn OutputSink> {
    if output == "-" {
        Box::new(StdoutSink::new())
    } else {
        Box::new(FileSink::new(output))
    }
}

/// Writes `bytes` to `path` through a [`FileSink`].
pub fn write_atomic(path: impl Into<PathBuf>, bytes: &[u8]) -> io::Result<()> {
    let mut sink = FileSink::new(path);
    sink.write_bytes(bytes)?;
    sink.commit()
}
