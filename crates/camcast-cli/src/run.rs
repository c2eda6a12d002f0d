// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Full streaming session: gather inputs, synthesize both legs, run them.

use crate::config::{AudioArgs, SessionConfig, TargetArgs, VideoArgs};
use crate::discovery::{system_devices, DeviceSource, FixedDevices};
use crate::error::CliError;
use crate::interactive;
use crate::prompt::Prompter;
use crate::runtime::{LaunchRuntime, PipelineRuntime};
use crate::session::{audio_device, video_device, Leg, Session};
use crate::utils::install_signal_handler;
use clap::Args as ClapArgs;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// JSON session file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask for every setting on the console
    #[arg(short, long)]
    interactive: bool,

    /// Print the pipelines instead of running them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Stream video only
    #[arg(long)]
    no_audio: bool,

    /// Run pipelines in-process instead of through gst-launch-1.0
    #[cfg(feature = "gstreamer")]
    #[arg(long)]
    in_process: bool,

    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    video: VideoArgs,

    #[command(flatten)]
    audio: AudioArgs,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    session: Session,
    legs: Vec<Leg>,
}

/// Discovered devices, or the flag-described ones when discovery is
/// unavailable in this build.
fn device_source(config: &SessionConfig) -> Result<Box<dyn DeviceSource>, CliError> {
    match system_devices() {
        Ok(source) => Ok(source),
        Err(CliError::Unsupported(msg)) => {
            log::debug!("{}; using devices from flags", msg);
            Ok(Box::new(FixedDevices::new(vec![
                video_device(&config.video)?,
                audio_device(&config.audio)?,
            ])))
        }
        Err(e) => Err(e),
    }
}

#[cfg(feature = "gstreamer")]
fn runtime(args: &Args) -> Result<Box<dyn PipelineRuntime>, CliError> {
    if args.in_process {
        return Ok(Box::new(crate::runtime::GstRuntime::new()?));
    }
    Ok(Box::new(LaunchRuntime::new()))
}

#[cfg(not(feature = "gstreamer"))]
fn runtime(_args: &Args) -> Result<Box<dyn PipelineRuntime>, CliError> {
    Ok(Box::new(LaunchRuntime::new()))
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing run command: {:?}", args);

    let flags = SessionConfig {
        target: args.target.clone(),
        video: args.video.clone(),
        audio: args.audio.clone(),
    };
    let config = match &args.config {
        Some(path) => flags.or(SessionConfig::load(path)?),
        None => flags,
    };
    let with_audio = !args.no_audio;

    let session = if args.interactive {
        let mut devices = device_source(&config)?;
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        interactive::gather(&mut prompter, devices.as_mut(), &config, with_audio)?
    } else {
        Session::from_config(&config, with_audio)?
    };
    let legs = session.legs();

    if args.dry_run {
        if json {
            let output = RunOutput { session, legs };
            let json_str = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json_str);
        } else {
            for leg in &legs {
                println!("{}: {}", leg.label, leg.launch);
            }
        }
        return Ok(());
    }

    for leg in &legs {
        log::info!("{} pipeline: {}", leg.label, leg.launch);
    }

    let term = install_signal_handler()?;
    let mut runtime = runtime(&args)?;
    log::info!("Streaming to {} (Ctrl+C to stop)", session.video.endpoint);
    runtime.run(&legs, &term)
}
