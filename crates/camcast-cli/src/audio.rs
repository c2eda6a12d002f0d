// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::config::{AudioArgs, TargetArgs, DEFAULT_HOST};
use crate::error::CliError;
use crate::session::{audio_device, resolve_target, AudioSession};
use camcast::pipeline::select_audio_branch;
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    audio: AudioArgs,
}

#[derive(Debug, Serialize)]
struct AudioOutput {
    #[serde(flatten)]
    session: AudioSession,
    branch: String,
    launch: String,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing audio command: {:?}", args);

    let (platform, _) = resolve_target(&args.target)?;
    let session = AudioSession::new(
        platform,
        &args.audio,
        DEFAULT_HOST,
        &audio_device(&args.audio)?,
    )?;
    let launch = session.graph().to_string();

    if json {
        let branch = select_audio_branch(session.platform, session.codec);
        let output = AudioOutput {
            session,
            branch: format!("{:?}", branch),
            launch,
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
        println!("{}", json_str);
    } else {
        println!("{}", launch);
    }

    Ok(())
}
