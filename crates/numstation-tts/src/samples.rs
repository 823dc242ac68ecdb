//! Number-range sample generation.

use std::fs;
use std::path::{Path, PathBuf};

use numstation_audio::sink::write_atomic;
use numstation_audio::{WavFormat, WavReader};

use crate::client::SpeechSynthesizer;
use crate::error::{TtsError, TtsResult};

/// One written sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSample {
    /// Number that was spoken.
    pub number: i64,
    /// Path of the `<n>.wav` file.
    pub path: PathBuf,
    /// Format reported by the synthesized stream.
    pub format: WavFormat,
}

/// Path of the sample for `number` inside `out_dir`.
pub fn sample_path(out_dir: &Path, number: i64) -> PathBuf {
    out_dir.join(format!("{}.wav", number))
}

/// Speaks every number in `start..=end` and writes `<n>.wav` into `out_dir`.
///
/// The directory is created if needed. Each clip is parsed as WAV before it
/// is written, so a bad response never lands on disk. `on_written` runs after
/// each file is in place.
pub fn generate_samples<S, F>(
    synth: &S,
    out_dir: &Path,
    start: i64,
    end: i64,
    mut on_written: F,
) -> TtsResult<Vec<WrittenSample>>
where
    S: SpeechSynthesizer + ?Sized,
    F: FnMut(&WrittenSample),
{
    if start > end {
        return Err(TtsError::InvalidRange { start, end });
    }

    fs::create_dir_all(out_dir).map_err(|source| TtsError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for number in start..=end {
        let text = number.to_string();
        let audio = synth.synthesize(&text)?;

        let path = sample_path(out_dir, number);
        let format = WavReader::from_bytes(&audio, &path)
            .map(|reader| reader.format())
            .map_err(|source| TtsError::InvalidAudio {
                text: text.clone(),
                source,
            })?;

        write_atomic(&path, &audio).map_err(|source| TtsError::Write {
            path: path.clone(),
            source,
        })?;

        let sample = WrittenSample {
            number,
            path,
            format,
        };
        on_written(&sample);
        written.push(sample);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use numstation_audio::writer::write_wav_to_vec;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Returns a tiny mono clip whose single sample encodes the number.
    struct FakeSynth {
        calls: RefCell<Vec<String>>,
    }

    impl FakeSynth {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SpeechSynthesizer for FakeSynth {
        fn synthesize(&self, text: &str) -> TtsResult<Vec<u8>> {
            self.calls.borrow_mut().push(text.to_string());
            let n: i16 = text.parse().unwrap();
            Ok(write_wav_to_vec(&WavFormat::mono16(24000), &n.to_le_bytes()).unwrap())
        }
    }

    struct GarbageSynth;

    impl SpeechSynthesizer for GarbageSynth {
        fn synthesize(&self, _text: &str) -> TtsResult<Vec<u8>> {
            Ok(b"<html>rate limited</html>".to_vec())
        }
    }

    #[test]
    fn test_writes_inclusive_range() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("samples");
        let synth = FakeSynth::new();

        let mut seen = Vec::new();
        let written = generate_samples(&synth, &out, 3, 6, |s| seen.push(s.number)).unwrap();

        assert_eq!(seen, vec![3, 4, 5, 6]);
        assert_eq!(*synth.calls.borrow(), vec!["3", "4", "5", "6"]);
        assert_eq!(written.len(), 4);
        for sample in &written {
            assert_eq!(sample.path, out.join(format!("{}.wav", sample.number)));
            assert_eq!(sample.format, WavFormat::mono16(24000));
            let frames = WavReader::open(&sample.path).unwrap().read_frames().unwrap();
            assert_eq!(frames, (sample.number as i16).to_le_bytes().to_vec());
        }
    }

    #[test]
    fn test_single_number_range() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate_samples(&FakeSynth::new(), dir.path(), 0, 0, |_| {}).unwrap();
        assert_eq!(written.len(), 1);
        assert!(dir.path().join("0.wav").exists());
    }

    #[test]
    fn test_existing_directory_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        generate_samples(&FakeSynth::new(), dir.path(), 1, 1, |_| {}).unwrap();
        generate_samples(&FakeSynth::new(), dir.path(), 2, 2, |_| {}).unwrap();
        assert!(dir.path().join("1.wav").exists());
        assert!(dir.path().join("2.wav").exists());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        let synth = FakeSynth::new();

        let err = generate_samples(&synth, &out, 10, 2, |_| {}).unwrap_err();
        assert!(matches!(err, TtsError::InvalidRange { start: 10, end: 2 }));
        assert!(synth.calls.borrow().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn test_invalid_audio_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_samples(&GarbageSynth, dir.path(), 7, 8, |_| {}).unwrap_err();

        match err {
            TtsError::InvalidAudio { text, .. } => assert_eq!(text, "7"),
            other => panic!("expected InvalidAudio, got {:?}", other),
        }
        assert!(!dir.path().join("7.wav").exists());
    }
}
