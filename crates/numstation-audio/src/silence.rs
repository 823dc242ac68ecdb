//! Digital silence used as the gap between clips.

use crate::error::{WavError, WavResult};
use crate::format::WavFormat;

/// Checks that a silence duration is finite and non-negative.
pub fn validate_duration(duration_secs: f64) -> WavResult<()> {
    if !duration_secs.is_finite() {
        return Err(WavError::invalid_argument(format!(
            "silence duration must be finite, got {}",
            duration_secs
        )));
    }
    if duration_secs < 0.0 {
        return Err(WavError::invalid_argument(format!(
            "silence duration must not be negative, got {}",
            duration_secs
        )));
    }
    Ok(())
}

/// Frames of silence for `duration_secs` at the format's frame rate.
///
/// The fractional frame is truncated.
pub fn silence_frames(format: &WavFormat, duration_secs: f64) -> WavResult<usize> {
    validate_duration(duration_secs)?;
    Ok((format.frame_rate as f64 * duration_secs).floor() as usize)
}

/// Zero-valued frame bytes lasting `duration_secs`.
///
/// Length is `channels * sample_width * floor(frame_rate * duration_secs)`.
pub fn generate_silence(format: &WavFormat, duration_secs: f64) -> WavResult<Vec<u8>> {
    let frames = silence_frames(format, duration_secs)?;
    Ok(vec![0u8; frames * format.block_align() as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_is_empty() {
        let silence = generate_silence(&WavFormat::stereo16(48000), 0.0).unwrap();
        assert!(silence.is_empty());
    }

    #[test]
    fn test_one_second_mono_8k() {
        let silence = generate_silence(&WavFormat::mono16(8000), 1.0).unwrap();
        assert_eq!(silence.len(), 16000);
        assert!(silence.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fraction_truncates() {
        let format = WavFormat::mono16(8000);
        // 8000 * 0.00019 = 1.52 frames
        assert_eq!(silence_frames(&format, 0.00019).unwrap(), 1);
        assert_eq!(silence_frames(&format, 0.5).unwrap(), 4000);

        let stereo24 = WavFormat::new(2, 3, 44100);
        assert_eq!(generate_silence(&stereo24, 0.01).unwrap().len(), 441 * 6);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let format = WavFormat::mono16(8000);
        for bad in [-0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = generate_silence(&format, bad).unwrap_err();
            assert!(matches!(err, WavError::InvalidArgument { .. }), "{}", bad);
        }
    }
}
