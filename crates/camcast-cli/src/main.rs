// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

mod audio;
mod config;
mod detect;
mod devices;
mod discovery;
mod error;
mod interactive;
mod modes;
mod prompt;
mod run;
mod runtime;
mod session;
mod utils;
mod video;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;

/// camcast - Camera and microphone RTP sender pipelines
#[derive(Parser)]
#[command(name = "camcast")]
#[command(version)]
#[command(about = "camcast - Build and run camera/microphone RTP sender pipelines")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the video sender pipeline for the given settings
    Video(video::Args),

    /// Print the audio sender pipeline for the given settings
    Audio(audio::Args),

    /// List capture modes from capability text or a camera
    Modes(modes::Args),

    /// Show the detected platform and board
    Detect(detect::Args),

    /// List cameras and microphones (requires the gstreamer feature)
    Devices(devices::Args),

    /// Build both pipelines and stream until stopped
    Run(run::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Video(args) => video::execute(args, cli.json),
        Commands::Audio(args) => audio::execute(args, cli.json),
        Commands::Modes(args) => modes::execute(args, cli.json),
        Commands::Detect(args) => detect::execute(args, cli.json),
        Commands::Devices(args) => devices::execute(args, cli.json),
        Commands::Run(args) => run::execute(args, cli.json),
    };

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}
