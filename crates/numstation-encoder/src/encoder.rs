//! ffmpeg subprocess encoder.
//!
//! WAV bytes are fed to ffmpeg on stdin and the Opus/Ogg result is written to
//! the requested target. File targets are encoded into a temporary file next
//! to the destination and renamed into place only when ffmpeg succeeds.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{EncoderError, EncoderResult};

/// Default timeout for ffmpeg execution (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Opus bitrate for one channel pair, in bits per second.
pub const STEREO_BITRATE: u32 = 64_000;

/// Environment variable naming the ffmpeg executable.
pub const FFMPEG_ENV: &str = "NUMSTATION_FFMPEG";

/// Opus bitrate for `channels` channels.
///
/// One [`STEREO_BITRATE`] per channel pair, never less than one pair's worth.
pub fn opus_bitrate(channels: u16) -> u32 {
    STEREO_BITRATE * (channels / 2).max(1) as u32
}

/// Where the encoded stream goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A file, replaced atomically on success.
    Path(PathBuf),
    /// The parent process's stdout.
    Stdout,
}

impl OutputTarget {
    /// Parses an output argument, where `-` means stdout.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::Path(PathBuf::from(arg))
        }
    }
}

/// libopus settings passed to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpusSettings {
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    /// Variable bitrate mode.
    pub vbr: bool,
    /// Encoder effort, 0 (fastest) to 10 (best).
    pub compression_level: u8,
}

impl OpusSettings {
    /// Settings for a stream with `channels` channels.
    pub fn for_channels(channels: u16) -> Self {
        Self {
            bitrate: opus_bitrate(channels),
            vbr: true,
            compression_level: 10,
        }
    }
}

/// A one-shot transcode job.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Complete WAV stream.
    pub wav: Vec<u8>,
    /// Codec settings.
    pub settings: OpusSettings,
    /// Output destination.
    pub target: OutputTarget,
}

/// Outcome of a successful transcode.
#[derive(Debug, Clone)]
pub struct EncodeReport {
    /// ffmpeg executable used.
    pub ffmpeg: PathBuf,
    /// Bitrate passed to libopus.
    pub bitrate: u32,
    /// WAV bytes fed to ffmpeg.
    pub input_bytes: usize,
    /// Wall-clock encode time.
    pub elapsed: Duration,
    /// Anything ffmpeg printed on stderr.
    pub stderr: String,
}

/// Configuration for the encoder.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Path to the ffmpeg executable.
    pub ffmpeg_path: Option<PathBuf>,
    /// Timeout for ffmpeg execution.
    pub timeout: Duration,
    /// Whether to capture ffmpeg's stderr.
    pub capture_output: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl EncoderConfig {
    /// Sets the ffmpeg executable path.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Sets whether stderr is captured or passed through.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// The ffmpeg encoder.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Creates an encoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with the given configuration.
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Locates the ffmpeg executable.
    ///
    /// Order: configured path, `NUMSTATION_FFMPEG`, then `PATH`. A configured
    /// or env path that does not resolve is an error, not a fallback.
    pub fn find_ffmpeg(&self) -> EncoderResult<PathBuf> {
        let from_env = std::env::var_os(FFMPEG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        resolve_ffmpeg(self.config.ffmpeg_path.as_deref(), from_env.as_deref())
    }

    /// Transcodes `request.wav` to Opus in Ogg.
    pub fn encode(&self, request: &EncodeRequest) -> EncoderResult<EncodeReport> {
        if request.wav.is_empty() {
            return Err(EncoderError::invalid_request("no audio data"));
        }
        if request.settings.bitrate == 0 {
            return Err(EncoderError::invalid_request("bitrate must be positive"));
        }
        if request.settings.compression_level > 10 {
            return Err(EncoderError::invalid_request(
                "compression level must be between 0 and 10",
            ));
        }

        let ffmpeg = self.find_ffmpeg()?;
        let start = Instant::now();

        let stderr = match &request.target {
            OutputTarget::Stdout => {
                self.run(&ffmpeg, &request.wav, &request.settings, OsString::from("pipe:1"), true)?
            }
            OutputTarget::Path(path) => {
                let staging = staging_file(path).map_err(EncoderError::OutputFailed)?;
                let stderr = self.run(
                    &ffmpeg,
                    &request.wav,
                    &request.settings,
                    staging.path().as_os_str().to_owned(),
                    false,
                )?;
                staging
                    .persist(path)
                    .map_err(|e| EncoderError::OutputFailed(e.error))?;
                stderr
            }
        };

        Ok(EncodeReport {
            ffmpeg,
            bitrate: request.settings.bitrate,
            input_bytes: request.wav.len(),
            elapsed: start.elapsed(),
            stderr,
        })
    }

    fn run(
        &self,
        ffmpeg: &Path,
        wav: &[u8],
        settings: &OpusSettings,
        output: OsString,
        to_stdout: bool,
    ) -> EncoderResult<String> {
        let mut cmd = Command::new(ffmpeg);
        cmd.args(build_args(settings, output)).stdin(Stdio::piped());
        if to_stdout {
            cmd.stdout(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null());
        }
        if self.config.capture_output {
            cmd.stderr(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(EncoderError::SpawnFailed)?;
        let stdin = child.stdin.take();
        let stderr_pipe = child.stderr.take();
        let timeout = self.config.timeout;

        // stdin and stderr are serviced on their own threads so neither pipe
        // can fill up and stall the child
        let (status, stderr, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(wav)?;
                }
                Ok(())
            });
            let reader = stderr_pipe.map(|mut pipe| {
                scope.spawn(move || {
                    let mut buf = String::new();
                    let _ = pipe.read_to_string(&mut buf);
                    buf
                })
            });

            let status = wait_with_timeout(&mut child, timeout);
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            let stderr = reader
                .map(|handle| handle.join().unwrap_or_default())
                .unwrap_or_default();
            (status, stderr, written)
        });

        let status = status?;
        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(EncoderError::process_failed(exit_code, stderr.trim()));
        }
        written.map_err(EncoderError::StdinFailed)?;

        Ok(stderr)
    }
}

/// Resolves ffmpeg from an explicit path, an env value, or `PATH`, in that order.
pub fn resolve_ffmpeg(
    configured: Option<&Path>,
    from_env: Option<&Path>,
) -> EncoderResult<PathBuf> {
    match configured.or(from_env) {
        Some(path) => resolve_named(path),
        None => which::which("ffmpeg").map_err(|_| EncoderError::FfmpegNotFound),
    }
}

fn resolve_named(path: &Path) -> EncoderResult<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    // A bare name like "ffmpeg7" is looked up in PATH
    which::which(path).map_err(|_| EncoderError::ConfiguredPathMissing {
        path: path.to_path_buf(),
    })
}

/// Builds ffmpeg arguments for an Opus/Ogg transcode from stdin.
pub fn build_args(settings: &OpusSettings, output: impl Into<OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
        "pipe:0",
        "-c:a",
        "libopus",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    args.push("-b:a".into());
    args.push(settings.bitrate.to_string().into());
    args.push("-vbr".into());
    args.push((if settings.vbr { "on" } else { "off" }).into());
    args.push("-compression_level".into());
    args.push(settings.compression_level.to_string().into());
    args.push("-f".into());
    args.push("ogg".into());
    args.push("-y".into());
    args.push(output.into());
    args
}

fn staging_file(target: &Path) -> io::Result<tempfile::NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tempfile::Builder::new()
        .prefix(".numstation_")
        .suffix(".ogg.partial")
        .tempfile_in(dir)
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> EncoderResult<ExitStatus> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EncoderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => return Err(EncoderError::SpawnFailed(e)),
        }
    }
}
