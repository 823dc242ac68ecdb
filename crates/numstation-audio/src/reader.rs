//! RIFF/WAVE header parsing and PCM frame extraction.
//!
//! Only the `fmt ` and `data` chunks are interpreted; every other chunk is
//! skipped on word alignment. Frame data is returned as raw little-endian
//! bytes exactly as stored in the file.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{WavError, WavResult};
use crate::format::WavFormat;

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the `fmt ` body that precedes the extensible fields.
const FMT_BASE_SIZE: u32 = 16;
/// Size of a `fmt ` body carrying WAVE_FORMAT_EXTENSIBLE fields.
const FMT_EXTENSIBLE_SIZE: u32 = 40;

/// A parsed WAV header positioned over its `data` chunk.
#[derive(Debug)]
pub struct WavReader<R> {
    inner: R,
    path: PathBuf,
    format: WavFormat,
    data_start: u64,
    data_len: u64,
}

impl WavReader<BufReader<File>> {
    /// Opens a WAV file and parses its header.
    pub fn open(path: impl AsRef<Path>) -> WavResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| WavError::read(path, e))?;
        Self::new(BufReader::new(file), path)
    }
}

impl<'a> WavReader<Cursor<&'a [u8]>> {
    /// Parses a WAV held in memory. `label` names it in error messages.
    pub fn from_bytes(bytes: &'a [u8], label: impl Into<PathBuf>) -> WavResult<Self> {
        Self::new(Cursor::new(bytes), label)
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Parses the header from `inner`, leaving the reader at the start of the
    /// `data` chunk.
    pub fn new(mut inner: R, path: impl Into<PathBuf>) -> WavResult<Self> {
        let path = path.into();
        let fail = |e: io::Error| header_error(&path, e);

        let mut magic = [0u8; 4];
        inner.read_exact(&mut magic).map_err(fail)?;
        if &magic != b"RIFF" {
            return Err(WavError::invalid_wav(&path, "missing RIFF header"));
        }
        let _riff_size = inner.read_u32::<LittleEndian>().map_err(fail)?;
        inner.read_exact(&mut magic).map_err(fail)?;
        if &magic != b"WAVE" {
            return Err(WavError::invalid_wav(&path, "missing WAVE identifier"));
        }

        let mut format: Option<WavFormat> = None;

        loop {
            let mut chunk_id = [0u8; 4];
            match inner.read_exact(&mut chunk_id) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    let message = if format.is_none() {
                        "missing fmt chunk"
                    } else {
                        "missing data chunk"
                    };
                    return Err(WavError::invalid_wav(&path, message));
                }
                Err(e) => return Err(WavError::read(&path, e)),
            }
            let chunk_size = inner.read_u32::<LittleEndian>().map_err(fail)?;

            match &chunk_id {
                b"fmt " => {
                    let parsed = read_fmt_chunk(&mut inner, chunk_size, &path)?;
                    format = Some(parsed);
                }
                b"data" => {
                    let Some(format) = format else {
                        return Err(WavError::invalid_wav(&path, "data chunk before fmt chunk"));
                    };
                    let data_start = inner.stream_position().map_err(fail)?;
                    return Ok(Self {
                        inner,
                        path,
                        format,
                        data_start,
                        data_len: chunk_size as u64,
                    });
                }
                _ => {
                    // Chunks are word-aligned
                    let padded = chunk_size as i64 + (chunk_size & 1) as i64;
                    inner.seek(SeekFrom::Current(padded)).map_err(fail)?;
                }
            }
        }
    }

    /// Format triple from the `fmt ` chunk.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Path (or label) this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of whole frames declared by the `data` chunk.
    pub fn num_frames(&self) -> usize {
        self.format.frames_in(self.data_len as usize)
    }

    /// Reads every frame of the `data` chunk.
    ///
    /// A file truncated inside its `data` chunk yields the whole frames that
    /// are present.
    pub fn read_frames(mut self) -> WavResult<Vec<u8>> {
        let path = self.path;
        self.inner
            .seek(SeekFrom::Start(self.data_start))
            .map_err(|e| WavError::read(&path, e))?;

        let mut frames = Vec::with_capacity(self.data_len as usize);
        self.inner
            .take(self.data_len)
            .read_to_end(&mut frames)
            .map_err(|e| WavError::read(&path, e))?;

        let whole = self.format.frames_in(frames.len()) * self.format.block_align() as usize;
        frames.truncate(whole);
        Ok(frames)
    }
}

/// Reads the format of a WAV file without loading its frames.
pub fn read_format(path: impl AsRef<Path>) -> WavResult<WavFormat> {
    WavReader::open(path).map(|reader| reader.format())
}

fn read_fmt_chunk<R: Read + Seek>(
    inner: &mut R,
    chunk_size: u32,
    path: &Path,
) -> WavResult<WavFormat> {
    let fail = |e: io::Error| header_error(path, e);

    if chunk_size < FMT_BASE_SIZE {
        return Err(WavError::invalid_wav(
            path,
            format!("fmt chunk too small: {} bytes", chunk_size),
        ));
    }

    let audio_format = inner.read_u16::<LittleEndian>().map_err(fail)?;
    let channels = inner.read_u16::<LittleEndian>().map_err(fail)?;
    let frame_rate = inner.read_u32::<LittleEndian>().map_err(fail)?;
    let _byte_rate = inner.read_u32::<LittleEndian>().map_err(fail)?;
    let _block_align = inner.read_u16::<LittleEndian>().map_err(fail)?;
    let bits_per_sample = inner.read_u16::<LittleEndian>().map_err(fail)?;
    let mut consumed = FMT_BASE_SIZE;

    match audio_format {
        WAVE_FORMAT_PCM => {}
        WAVE_FORMAT_EXTENSIBLE if chunk_size >= FMT_EXTENSIBLE_SIZE => {
            let _cb_size = inner.read_u16::<LittleEndian>().map_err(fail)?;
            let _valid_bits = inner.read_u16::<LittleEndian>().map_err(fail)?;
            let _channel_mask = inner.read_u32::<LittleEndian>().map_err(fail)?;
            let mut guid = [0u8; 16];
            inner.read_exact(&mut guid).map_err(fail)?;
            consumed = FMT_EXTENSIBLE_SIZE;
            // Sub-format GUID starts with the format tag
            if u16::from_le_bytes([guid[0], guid[1]]) != WAVE_FORMAT_PCM {
                return Err(WavError::invalid_wav(path, "extensible sub-format is not PCM"));
            }
        }
        other => {
            return Err(WavError::invalid_wav(
                path,
                format!("unsupported format tag 0x{:04X} (only PCM is supported)", other),
            ));
        }
    }

    if channels == 0 {
        return Err(WavError::invalid_wav(path, "channel count is zero"));
    }
    if bits_per_sample == 0 {
        return Err(WavError::invalid_wav(path, "bits per sample is zero"));
    }
    if frame_rate == 0 {
        return Err(WavError::invalid_wav(path, "frame rate is zero"));
    }

    let remaining = chunk_size - consumed + (chunk_size & 1);
    if remaining > 0 {
        inner
            .seek(SeekFrom::Current(remaining as i64))
            .map_err(fail)?;
    }

    let format = WavFormat::new(channels, bits_per_sample.div_ceil(8), frame_rate);
    format
        .check_header_fields()
        .map_err(|message| WavError::invalid_wav(path, message))?;
    Ok(format)
}

fn header_error(path: &Path, e: io::Error) -> WavError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        WavError::invalid_wav(path, "unexpected end of file in header")
    } else {
        WavError::read(path, e)
    }
}
