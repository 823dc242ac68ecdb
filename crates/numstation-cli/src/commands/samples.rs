//! Samples command implementation

use anyhow::{Context, Result};
use numstation_tts::{
    generate_samples, Credentials, GoogleTts, SpeechSynthesizer, TtsConfig, WrittenSample,
};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::status::Status;

/// Options for `numstation samples`.
#[derive(Debug, Clone)]
pub struct SamplesOptions {
    pub output_dir: PathBuf,
    pub start: i64,
    pub end: i64,
    pub language_code: String,
    pub voice: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub endpoint: String,
}

impl SamplesOptions {
    /// Client configuration for these options. An API key wins over a token.
    pub fn tts_config(&self) -> TtsConfig {
        let config = TtsConfig::default()
            .endpoint(&self.endpoint)
            .language_code(&self.language_code)
            .voice(&self.voice);
        let credentials = non_empty(&self.api_key)
            .map(Credentials::ApiKey)
            .or_else(|| non_empty(&self.access_token).map(Credentials::AccessToken));
        match credentials {
            Some(credentials) => config.credentials(credentials),
            None => config,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Run the samples command
pub fn run(options: &SamplesOptions, status: Status) -> Result<ExitCode> {
    let tts = GoogleTts::new(options.tts_config()).context("Failed to set up Text-to-Speech client")?;
    execute(&tts, options, status)?;
    Ok(ExitCode::SUCCESS)
}

/// Generates the samples with any synthesizer.
pub fn execute<S: SpeechSynthesizer + ?Sized>(
    synth: &S,
    options: &SamplesOptions,
    status: Status,
) -> Result<Vec<WrittenSample>> {
    status.step(
        "Synthesizing:",
        format!(
            "{}..={} with {} ({}) into {}",
            options.start,
            options.end,
            options.voice,
            options.language_code,
            options.output_dir.display()
        ),
    );

    let on_written = |sample: &WrittenSample| {
        status.item(format!(
            "Audio content written to file \"{}\"",
            sample.path.display()
        ));
    };
    let written = generate_samples(
        synth,
        &options.output_dir,
        options.start,
        options.end,
        on_written,
    )
    .with_context(|| {
        format!(
            "Failed to generate samples in {}",
            options.output_dir.display()
        )
    })?;

    status.success(format!(
        "{} samples in {}",
        written.len(),
        options.output_dir.display()
    ));
    Ok(written)
}
