//! PCM WAV writer.
//!
//! Frames are accumulated in memory and the header is derived from the number
//! of bytes actually written when the writer is finished. Output carries no
//! timestamps or variable metadata, so identical input produces identical
//! bytes.

use std::io::{self, Write};

use crate::format::WavFormat;

/// Size of the canonical RIFF + `fmt ` + `data` header.
pub const HEADER_LEN: usize = 44;

/// Writes a complete WAV stream for `pcm_data` to `writer`.
///
/// An odd-length data chunk is followed by a single pad byte, which is
/// counted in the RIFF size but not in the data size.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    format
        .check_header_fields()
        .map_err(|message| io::Error::new(io::ErrorKind::InvalidInput, message))?;
    let data_size = u32::try_from(pcm_data.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "PCM data exceeds the 4 GiB WAV limit",
        )
    })?;
    let pad = data_size & 1;
    // Total file size minus the 8 bytes of the RIFF chunk header
    let riff_size = (HEADER_LEN as u32 - 8)
        .checked_add(data_size + pad)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "WAV stream too large"))?;

    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.frame_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample().to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;
    if pad == 1 {
        writer.write_all(&[0])?;
    }

    Ok(())
}

/// Writes a WAV stream to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len() + 1);
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}

/// Accumulates frame blocks and emits a WAV stream sized from what was written.
#[derive(Debug)]
pub struct WavWriter {
    format: WavFormat,
    data: Vec<u8>,
}

impl WavWriter {
    /// Creates an empty writer for `format`.
    pub fn new(format: WavFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
        }
    }

    /// Appends raw frame bytes.
    pub fn write_frames(&mut self, frames: &[u8]) {
        self.data.extend_from_slice(frames);
    }

    /// Output format.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Bytes of frame data written so far.
    pub fn bytes_written(&self) -> usize {
        self.data.len()
    }

    /// Whole frames written so far.
    pub fn frames_written(&self) -> usize {
        self.format.frames_in(self.data.len())
    }

    /// Serializes header and frames into `writer`.
    pub fn finish_into<W: Write>(self, writer: &mut W) -> io::Result<()> {
        write_wav(writer, &self.format, &self.data)
    }

    /// Serializes header and frames into a new byte vector.
    pub fn finish(self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() + 1);
        self.finish_into(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let format = WavFormat::stereo16(44100);
        let wav = write_wav_to_vec(&format, &[0u8; 8]).unwrap();

        assert_eq!(wav.len(), HEADER_LEN + 8);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 8);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), 1);
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 44100);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 176400);
        assert_eq!(u16::from_le_bytes([wav[32], wav[33]]), 4);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 8);
    }

    #[test]
    fn test_odd_data_is_padded() {
        let format = WavFormat::new(1, 1, 8000);
        let wav = write_wav_to_vec(&format, &[0x80, 0x81, 0x82]).unwrap();

        assert_eq!(wav.len(), HEADER_LEN + 4);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 3);
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 4);
        assert_eq!(wav[wav.len() - 1], 0);
    }

    #[test]
    fn test_writer_sizes_header_from_bytes_written() {
        let format = WavFormat::mono16(8000);
        let mut writer = WavWriter::new(format);
        writer.write_frames(&[1, 0, 2, 0]);
        writer.write_frames(&[]);
        writer.write_frames(&[3, 0]);
        assert_eq!(writer.bytes_written(), 6);
        assert_eq!(writer.frames_written(), 3);

        let wav = writer.finish().unwrap();
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 6);
        assert_eq!(&wav[HEADER_LEN..], &[1, 0, 2, 0, 3, 0]);
    }

    #[test]
    fn test_empty_writer_is_valid_wav() {
        let wav = WavWriter::new(WavFormat::mono16(8000)).finish().unwrap();
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 0);
    }

    #[test]
    fn test_unrepresentable_format_is_an_error() {
        let err = write_wav_to_vec(&WavFormat::new(40_000, 2, 8000), &[0; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let writer = WavWriter::new(WavFormat::stereo16(4_000_000_000));
        assert!(writer.finish().is_err());
    }
}
