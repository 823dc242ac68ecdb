//! WAV format parameters shared by every input of a concatenation run.

use std::fmt;

/// The format triple compared across input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Bytes per single-channel sample (2 for 16-bit audio).
    pub sample_width: u16,
    /// Frames per second in Hz.
    pub frame_rate: u32,
}

impl WavFormat {
    /// Creates a format from its three parameters.
    pub fn new(channels: u16, sample_width: u16, frame_rate: u32) -> Self {
        Self {
            channels,
            sample_width,
            frame_rate,
        }
    }

    /// Creates a 16-bit mono format.
    pub fn mono16(frame_rate: u32) -> Self {
        Self::new(1, 2, frame_rate)
    }

    /// Creates a 16-bit stereo format.
    pub fn stereo16(frame_rate: u32) -> Self {
        Self::new(2, 2, frame_rate)
    }

    /// Checks that the derived header fields fit their on-disk widths.
    ///
    /// `bits_per_sample` and `block_align` are `u16`, `byte_rate` is `u32`.
    /// The other accessors assume this holds.
    pub fn check_header_fields(&self) -> Result<(), &'static str> {
        self.sample_width
            .checked_mul(8)
            .ok_or("bits per sample does not fit in 16 bits")?;
        let block_align = self
            .channels
            .checked_mul(self.sample_width)
            .ok_or("block align (channels * sample width) does not fit in 16 bits")?;
        self.frame_rate
            .checked_mul(block_align as u32)
            .ok_or("byte rate (frame rate * block align) does not fit in 32 bits")?;
        Ok(())
    }

    /// Bits per sample as stored in the `fmt ` chunk.
    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// Bytes per frame (one sample across all channels).
    pub fn block_align(&self) -> u16 {
        self.channels * self.sample_width
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> u32 {
        self.frame_rate * self.block_align() as u32
    }

    /// Number of whole frames contained in `bytes` bytes.
    pub fn frames_in(&self, bytes: usize) -> usize {
        match self.block_align() {
            0 => 0,
            align => bytes / align as usize,
        }
    }

    /// Duration in seconds of `frames` frames.
    pub fn duration_secs(&self, frames: usize) -> f64 {
        if self.frame_rate == 0 {
            return 0.0;
        }
        frames as f64 / self.frame_rate as f64
    }
}

impl fmt::Display for WavFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ch / {}-bit / {} Hz",
            self.channels,
            self.bits_per_sample(),
            self.frame_rate
        )
    }
}
