//! Concat command implementation
//!
//! Picks random samples from a glob and joins them with silence, optionally
//! transcoding the result to Opus.

use anyhow::{Context, Result};
use numstation_audio::selection::{choose_samples, create_rng, entropy_seed, resolve_glob};
use numstation_audio::{
    concatenate_files, concatenate_to_vec, sink_for, ConcatReport, Concatenator, SampleFile,
};
use numstation_encoder::{
    EncodeReport, EncodeRequest, Encoder, EncoderConfig, OpusSettings, OutputTarget,
};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::status::Status;

/// Options for `numstation concat`.
#[derive(Debug, Clone)]
pub struct ConcatOptions {
    /// Output path, or `-` for stdout.
    pub output: String,
    pub samples_glob: String,
    pub silence_secs: f64,
    pub sample_count: usize,
    pub opus: bool,
    pub seed: Option<u64>,
    pub ffmpeg: Option<PathBuf>,
}

/// What a concat run produced.
#[derive(Debug)]
pub struct ConcatOutcome {
    /// Seed the selection used.
    pub seed: u64,
    /// Chosen samples in output order.
    pub chosen: Vec<PathBuf>,
    pub report: ConcatReport,
    /// Present when the track was transcoded.
    pub encode: Option<EncodeReport>,
}

/// Run the concat command
pub fn run(options: &ConcatOptions, status: Status) -> Result<ExitCode> {
    execute(options, status)?;
    Ok(ExitCode::SUCCESS)
}

/// Runs the command and returns what it did.
pub fn execute(options: &ConcatOptions, status: Status) -> Result<ConcatOutcome> {
    // Reject bad silence before touching the filesystem
    Concatenator::new(options.silence_secs).context("Invalid --silence")?;

    let candidates = resolve_glob(&options.samples_glob)
        .with_context(|| format!("Failed to resolve samples from '{}'", options.samples_glob))?;

    let seed = options.seed.unwrap_or_else(entropy_seed);
    let mut rng = create_rng(seed);
    let chosen = choose_samples(&candidates, options.sample_count, &mut rng)
        .context("Failed to choose samples")?;

    status.step(
        "Selected:",
        format!(
            "{} of {} samples (seed {})",
            chosen.len(),
            candidates.len(),
            seed
        ),
    );
    for path in &chosen {
        status.item(path.display());
    }

    let (report, encode) = if options.opus {
        let (report, encode) = concat_opus(options, &chosen)?;
        (report, Some(encode))
    } else {
        (concat_wav(options, &chosen)?, None)
    };

    status.success(format!(
        "{} frames at {} ({:.2}s) -> {}",
        report.total_frames,
        report.format,
        report.duration_secs(),
        display_output(&options.output)
    ));
    if let Some(ref encode) = encode {
        status.item(format!(
            "Opus {} kbit/s via {} in {:.2}s",
            encode.bitrate / 1000,
            encode.ffmpeg.display(),
            encode.elapsed.as_secs_f64()
        ));
        for line in encode.stderr.lines().filter(|l| !l.trim().is_empty()) {
            status.warn(format!("ffmpeg: {}", line));
        }
    }

    Ok(ConcatOutcome {
        seed,
        chosen,
        report,
        encode,
    })
}

fn concat_wav(options: &ConcatOptions, chosen: &[PathBuf]) -> Result<ConcatReport> {
    let mut sink = sink_for(&options.output);
    concatenate_files(chosen, options.silence_secs, sink.as_mut())
        .with_context(|| format!("Failed to write {}", display_output(&options.output)))
}

fn concat_opus(
    options: &ConcatOptions,
    chosen: &[PathBuf],
) -> Result<(ConcatReport, EncodeReport)> {
    let samples: Vec<SampleFile> = chosen.iter().cloned().map(SampleFile::from).collect();
    let (wav, report) = concatenate_to_vec(&samples, options.silence_secs)
        .context("Failed to concatenate samples")?;

    let mut config = EncoderConfig::default();
    if let Some(ref path) = options.ffmpeg {
        config = config.ffmpeg_path(path);
    }
    let request = EncodeRequest {
        wav,
        settings: OpusSettings::for_channels(report.format.channels),
        target: OutputTarget::from_arg(&options.output),
    };
    let encode = Encoder::with_config(config)
        .encode(&request)
        .with_context(|| {
            format!(
                "Failed to encode {} to Opus",
                display_output(&options.output)
            )
        })?;

    Ok((report, encode))
}

fn display_output(output: &str) -> &str {
    if output == "-" {
        "stdout"
    } else {
        output
    }
}
