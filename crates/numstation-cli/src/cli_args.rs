//! CLI argument definitions for the numbers-station command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// numbers-station - random spoken-number tracks from WAV samples
#[derive(Parser)]
#[command(name = "numstation")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Suppress status output on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Pick random samples and join them into one track
    Concat {
        /// Output file path, or - for stdout
        #[arg(short, long)]
        output: String,

        /// Glob pattern selecting candidate WAV samples (** recurses)
        #[arg(long)]
        samples_glob: String,

        /// Seconds of silence between samples
        #[arg(long, default_value_t = 0.0)]
        silence: f64,

        /// Number of samples to pick (with replacement)
        #[arg(long, default_value_t = 4)]
        samples: usize,

        /// Encode the track to Opus in Ogg with ffmpeg
        #[arg(long)]
        opus: bool,

        /// Seed for sample selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Path to the ffmpeg executable
        #[arg(long, env = "NUMSTATION_FFMPEG")]
        ffmpeg: Option<PathBuf>,
    },

    /// Generate spoken-number samples with Google Cloud Text-to-Speech
    Samples {
        /// Directory to write <n>.wav files into
        #[arg(short, long)]
        output_dir: PathBuf,

        /// First number to synthesize
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        start: i64,

        /// Last number to synthesize (inclusive)
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        end: i64,

        /// BCP-47 language code of the voice
        #[arg(long, default_value = "en-US")]
        language_code: String,

        /// Voice name
        #[arg(long, default_value = "en-US-Wavenet-E")]
        voice: String,

        /// Google Cloud API key
        #[arg(long, env = "GOOGLE_TTS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// OAuth access token, used when no API key is given
        #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Text-to-Speech API endpoint
        #[arg(long, default_value = "https://texttospeech.googleapis.com")]
        endpoint: String,
    },

    /// Check ffmpeg and Text-to-Speech configuration
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses_concat_defaults() {
        let cli = Cli::try_parse_from([
            "numstation",
            "concat",
            "-o",
            "out.wav",
            "--samples-glob",
            "samples/**/*.wav",
        ])
        .unwrap();
        assert!(!cli.quiet);
        match cli.command {
            Commands::Concat {
                output,
                samples_glob,
                silence,
                samples,
                opus,
                seed,
                ..
            } => {
                assert_eq!(output, "out.wav");
                assert_eq!(samples_glob, "samples/**/*.wav");
                assert_eq!(silence, 0.0);
                assert_eq!(samples, 4);
                assert!(!opus);
                assert_eq!(seed, None);
            }
            _ => panic!("expected concat command"),
        }
    }

    #[test]
    fn test_cli_parses_concat_to_stdout_with_opus() {
        let cli = Cli::try_parse_from([
            "numstation",
            "concat",
            "--output",
            "-",
            "--samples-glob",
            "*.wav",
            "--silence",
            "0.75",
            "--samples",
            "9",
            "--opus",
            "--seed",
            "42",
            "--quiet",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Concat {
                output,
                silence,
                samples,
                opus,
                seed,
                ..
            } => {
                assert_eq!(output, "-");
                assert_eq!(silence, 0.75);
                assert_eq!(samples, 9);
                assert!(opus);
                assert_eq!(seed, Some(42));
            }
            _ => panic!("expected concat command"),
        }
    }

    #[test]
    fn test_cli_concat_requires_glob() {
        let result = Cli::try_parse_from(["numstation", "concat", "-o", "out.wav"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_samples() {
        let cli = Cli::try_parse_from([
            "numstation",
            "samples",
            "-o",
            "voices/en",
            "--start",
            "-5",
            "--end",
            "5",
            "--voice",
            "en-GB-Wavenet-B",
        ])
        .unwrap();
        match cli.command {
            Commands::Samples {
                output_dir,
                start,
                end,
                language_code,
                voice,
                endpoint,
                ..
            } => {
                assert_eq!(output_dir, PathBuf::from("voices/en"));
                assert_eq!(start, -5);
                assert_eq!(end, 5);
                assert_eq!(language_code, "en-US");
                assert_eq!(voice, "en-GB-Wavenet-B");
                assert_eq!(endpoint, "https://texttospeech.googleapis.com");
            }
            _ => panic!("expected samples command"),
        }
    }

    #[test]
    fn test_cli_parses_samples_defaults() {
        let cli = Cli::try_parse_from(["numstation", "samples", "--output-dir", "out"]).unwrap();
        match cli.command {
            Commands::Samples { start, end, .. } => {
                assert_eq!(start, 0);
                assert_eq!(end, 100);
            }
            _ => panic!("expected samples command"),
        }
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["numstation", "doctor"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor));
    }
}
