//! Doctor command implementation
//!
//! Checks the external tools and credentials numbers-station relies on.

use anyhow::Result;
use colored::Colorize;
use numstation_encoder::{Encoder, EncoderConfig, EncoderError, FFMPEG_ENV};
use numstation_tts::client::{ACCESS_TOKEN_ENV, API_KEY_ENV};
use numstation_tts::Credentials;
use std::path::Path;
use std::process::{Command, ExitCode};

/// Run the doctor command
///
/// Checks:
/// - ffmpeg installation and libopus support (needed for `--opus`)
/// - Text-to-Speech credentials (needed for `samples`)
///
/// # Returns
/// Exit code: 0 unless a configured path is broken
pub fn run() -> Result<ExitCode> {
    println!("{}", "numbers-station Doctor".cyan().bold());
    println!("{}", "======================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} numstation-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match Encoder::with_config(EncoderConfig::default()).find_ffmpeg() {
        Ok(path) => {
            let version = ffmpeg_version(&path).unwrap_or_else(|| "unknown".to_string());
            println!("  {} ffmpeg {} ({})", "ok".green(), version, path.display());
            if has_libopus(&path) {
                println!("  {} libopus encoder available", "ok".green());
            } else {
                println!("  {} ffmpeg was built without libopus", "!!".yellow());
                println!("     {}", "--opus will fail with this ffmpeg.".dimmed());
            }
        }
        Err(EncoderError::FfmpegNotFound) => {
            println!("  {} ffmpeg not found in PATH", "!!".yellow());
            println!(
                "     {}",
                "ffmpeg is only required for --opus output.".dimmed()
            );
            println!(
                "     {}",
                format!("Install it or point {} at the executable.", FFMPEG_ENV).dimmed()
            );
        }
        Err(e) => {
            println!("  {} ffmpeg check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    println!("{}", "Text-to-Speech:".bold());
    match Credentials::from_env() {
        Some(Credentials::ApiKey(_)) => {
            println!("  {} API key from {}", "ok".green(), API_KEY_ENV);
        }
        Some(Credentials::AccessToken(_)) => {
            println!("  {} access token from {}", "ok".green(), ACCESS_TOKEN_ENV);
        }
        None => {
            println!("  {} no credentials in environment", "!!".yellow());
            println!(
                "     {}",
                format!(
                    "Set {} or {} to use `numstation samples`.",
                    API_KEY_ENV, ACCESS_TOKEN_ENV
                )
                .dimmed()
            );
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "FAILURE".red().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Version reported by `ffmpeg -version`.
fn ffmpeg_version(ffmpeg: &Path) -> Option<String> {
    let output = Command::new(ffmpeg).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_ffmpeg_version(&String::from_utf8_lossy(&output.stdout))
}

fn parse_ffmpeg_version(output: &str) -> Option<String> {
    // Parse "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) ..."
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("ffmpeg version "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(|v| v.to_string())
}

fn has_libopus(ffmpeg: &Path) -> bool {
    Command::new(ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|o| lists_libopus(&String::from_utf8_lossy(&o.stdout)))
        .unwrap_or(false)
}

fn lists_libopus(encoders: &str) -> bool {
    // Rows look like " A....D libopus              libopus Opus (codec opus)"
    encoders
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some("libopus"))
}
