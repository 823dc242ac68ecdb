//! Encoder behaviour against shell scripts standing in for ffmpeg.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use numstation_encoder::{
    EncodeRequest, Encoder, EncoderConfig, EncoderError, OpusSettings, OutputTarget,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn request(target: PathBuf) -> EncodeRequest {
    EncodeRequest {
        wav: b"RIFF....WAVEfmt fake payload".to_vec(),
        settings: OpusSettings::for_channels(2),
        target: OutputTarget::Path(target),
    }
}

#[test]
fn test_successful_encode_moves_output_into_place() {
    let dir = TempDir::new().unwrap();
    // Copy stdin to the last argument (the output file)
    let ffmpeg = script(dir.path(), "ffmpeg", "for last; do :; done\ncat > \"$last\"");
    let target = dir.path().join("station.ogg");

    let encoder = Encoder::with_config(EncoderConfig::default().ffmpeg_path(&ffmpeg));
    let req = request(target.clone());
    let report = encoder.encode(&req).unwrap();

    assert_eq!(report.ffmpeg, ffmpeg);
    assert_eq!(report.bitrate, 64_000);
    assert_eq!(report.input_bytes, req.wav.len());
    assert_eq!(fs::read(&target).unwrap(), req.wav);
}

#[test]
fn test_arguments_reach_ffmpeg() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("args.txt");
    let body = format!(
        "echo \"$@\" > '{}'\nfor last; do :; done\ncat > \"$last\"",
        log.display()
    );
    let ffmpeg = script(dir.path(), "ffmpeg", &body);

    let encoder = Encoder::with_config(EncoderConfig::default().ffmpeg_path(&ffmpeg));
    let mut req = request(dir.path().join("out.ogg"));
    req.settings = OpusSettings::for_channels(4);
    encoder.encode(&req).unwrap();

    let args = fs::read_to_string(&log).unwrap();
    assert!(args.contains("-i pipe:0"));
    assert!(args.contains("-c:a libopus"));
    assert!(args.contains("-b:a 128000"));
    assert!(args.contains("-f ogg"));
}

#[test]
fn test_failure_captures_stderr_and_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let ffmpeg = script(
        dir.path(),
        "ffmpeg",
        "cat > /dev/null\necho \"Unknown encoder 'libopus'\" >&2\nexit 3",
    );
    let target = dir.path().join("station.ogg");

    let encoder = Encoder::with_config(EncoderConfig::default().ffmpeg_path(&ffmpeg));
    let err = encoder.encode(&request(target.clone())).unwrap_err();

    match err {
        EncoderError::ProcessFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 3);
            assert_eq!(stderr, "Unknown encoder 'libopus'");
        }
        other => panic!("expected ProcessFailed, got {:?}", other),
    }
    assert!(!target.exists());
    // Staging file is cleaned up too
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}

#[test]
fn test_timeout_kills_encoder() {
    let dir = TempDir::new().unwrap();
    let ffmpeg = script(dir.path(), "ffmpeg", "exec sleep 10");

    let config = EncoderConfig::default()
        .ffmpeg_path(&ffmpeg)
        .timeout(Duration::from_millis(200));
    let err = Encoder::with_config(config)
        .encode(&request(dir.path().join("out.ogg")))
        .unwrap_err();

    assert!(matches!(err, EncoderError::Timeout { .. }));
}

#[test]
fn test_large_input_does_not_deadlock() {
    let dir = TempDir::new().unwrap();
    // Floods stderr while consuming stdin
    let ffmpeg = script(
        dir.path(),
        "ffmpeg",
        "for last; do :; done\ni=0\nwhile [ $i -lt 2000 ]; do echo \"progress line $i padding padding padding\" >&2; i=$((i+1)); done\ncat > \"$last\"",
    );
    let target = dir.path().join("big.ogg");

    let mut req = request(target.clone());
    req.wav = vec![7u8; 1 << 20];
    let report = Encoder::with_config(EncoderConfig::default().ffmpeg_path(&ffmpeg))
        .encode(&req)
        .unwrap();

    assert!(report.stderr.contains("progress line 1999"));
    assert_eq!(fs::metadata(&target).unwrap().len(), 1 << 20);
}
