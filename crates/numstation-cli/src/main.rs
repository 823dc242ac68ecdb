//! numbers-station CLI - random spoken-number tracks
//!
//! This binary picks WAV samples, joins them with silence and optionally
//! transcodes the result to Opus. It can also generate the samples.

use clap::Parser;
use std::process::ExitCode;

use numstation_cli::commands;
use numstation_cli::commands::concat::ConcatOptions;
use numstation_cli::commands::samples::SamplesOptions;
use numstation_cli::status::Status;

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let status = Status::new(cli.quiet);

    let result = match cli.command {
        Commands::Concat {
            output,
            samples_glob,
            silence,
            samples,
            opus,
            seed,
            ffmpeg,
        } => commands::concat::run(
            &ConcatOptions {
                output,
                samples_glob,
                silence_secs: silence,
                sample_count: samples,
                opus,
                seed,
                ffmpeg,
            },
            status,
        ),
        Commands::Samples {
            output_dir,
            start,
            end,
            language_code,
            voice,
            api_key,
            access_token,
            endpoint,
        } => commands::samples::run(
            &SamplesOptions {
                output_dir,
                start,
                end,
                language_code,
                voice,
                api_key,
                access_token,
                endpoint,
            },
            status,
        ),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
