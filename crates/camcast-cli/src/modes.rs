// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Capture mode listing from capability text or a discovered camera.

use crate::discovery::system_devices;
use crate::error::CliError;
use crate::session::VIDEO_CLASS;
use camcast::caps::parse_caps;
use camcast::device::DeviceDescriptor;
use camcast::modes::{require_modes, Mode, DEFAULT_MODE_LIMIT};
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Capability text, e.g. "video/x-raw, format=(string)NV12, width=(int)640, ..."
    #[arg(long)]
    caps: Option<String>,

    /// Camera to inspect by (partial) display name [default: first found]
    #[arg(short, long, conflicts_with = "caps")]
    device: Option<String>,

    /// Maximum number of modes to list
    #[arg(short, long, default_value_t = DEFAULT_MODE_LIMIT)]
    limit: usize,
}

#[derive(Debug, Serialize)]
struct ModesOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<String>,
    modes: Vec<Mode>,
}

fn pick_camera(name: Option<&str>) -> Result<DeviceDescriptor, CliError> {
    let mut cameras = system_devices()?.devices(VIDEO_CLASS)?;
    let idx = match name {
        Some(name) => cameras
            .iter()
            .position(|d| d.display_name().contains(name))
            .ok_or_else(|| CliError::DeviceNotFound(format!("no camera named {:?}", name)))?,
        None => 0,
    };
    Ok(cameras.swap_remove(idx))
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing modes command: {:?}", args);

    let (device, caps) = match &args.caps {
        Some(text) => (None, parse_caps(text)?),
        None => {
            let camera = pick_camera(args.device.as_deref())?;
            (
                Some(camera.display_name().to_string()),
                camera.caps().clone(),
            )
        }
    };

    let modes = match require_modes(&caps, args.limit) {
        Ok(modes) => modes,
        Err(camcast::Error::NoCapabilityMatch) => {
            log::warn!(
                "No usable capture modes; set the mode with --resolution, --format and --framerate"
            );
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let output = ModesOutput { device, modes };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
        println!("{}", json_str);
    } else {
        if let Some(device) = &device {
            println!("{}:", device);
        }
        for (i, mode) in modes.iter().enumerate() {
            println!("  {}) {}", i + 1, mode);
        }
    }

    Ok(())
}
