// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::error::CliError;
use camcast::platform::{detect, model_path, LinuxVariant, Platform};
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {}

#[derive(Debug, Serialize)]
struct DetectOutput {
    platform: Platform,
    variant: LinuxVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_path: Option<String>,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing detect command: {:?}", args);

    let (platform, variant) = detect()?;
    let output = DetectOutput {
        platform,
        variant,
        model_path: (platform == Platform::Linux).then(model_path),
    };

    if json {
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
        println!("{}", json_str);
    } else {
        println!("Platform: {}", output.platform);
        if platform == Platform::Linux {
            println!("Variant:  {}", output.variant);
        }
    }

    Ok(())
}
