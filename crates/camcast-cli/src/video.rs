// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::config::{TargetArgs, VideoArgs};
use crate::error::CliError;
use crate::session::{resolve_target, video_device, VideoSession};
use camcast::pipeline::select_video_branch;
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    video: VideoArgs,
}

#[derive(Debug, Serialize)]
struct VideoOutput {
    #[serde(flatten)]
    session: VideoSession,
    branch: String,
    launch: String,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing video command: {:?}", args);

    let target = resolve_target(&args.target)?;
    let session = VideoSession::new(target, &args.video, &video_device(&args.video)?, None)?;
    let launch = session.graph().to_string();

    if json {
        let branch = select_video_branch(
            session.platform,
            session.variant,
            session.codec,
            session.h264_mode,
        );
        let output = VideoOutput {
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
