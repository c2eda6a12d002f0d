// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Discovered capture devices and how a pipeline would address them.

use crate::discovery::{system_devices, DeviceSource};
use crate::error::CliError;
use crate::session::{AUDIO_CLASS, VIDEO_CLASS};
use camcast::device::{resolve, DeviceDescriptor, PropertyFragment};
use camcast::modes::Mode;
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Show only cameras
    #[arg(long, conflicts_with = "audio")]
    video: bool,

    /// Show only microphones
    #[arg(long)]
    audio: bool,

    /// Maximum number of modes listed per camera
    #[arg(short, long, default_value_t = 5)]
    limit: usize,
}

#[derive(Debug, Serialize)]
struct DeviceInfo {
    name: String,
    class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    factory: Option<String>,
    property: PropertyFragment,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    modes: Vec<Mode>,
}

#[derive(Debug, Default, Serialize)]
struct DevicesOutput {
    cameras: Vec<DeviceInfo>,
    microphones: Vec<DeviceInfo>,
}

fn describe(device: &DeviceDescriptor, limit: usize) -> DeviceInfo {
    DeviceInfo {
        name: device.display_name().to_string(),
        class: device.device_class().to_string(),
        factory: device.factory().map(str::to_string),
        property: resolve(device),
        modes: device.modes(limit),
    }
}

/// Devices of one class; none found is not an error here.
fn list(
    source: &mut dyn DeviceSource,
    class: &str,
    limit: usize,
) -> Result<Vec<DeviceInfo>, CliError> {
    match source.devices(class) {
        Ok(devices) => Ok(devices.iter().map(|d| describe(d, limit)).collect()),
        Err(CliError::DeviceNotFound(msg)) => {
            log::info!("{}", msg);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn print_group(title: &str, devices: &[DeviceInfo]) {
    println!("{} ({}):", title, devices.len());
    for device in devices {
        println!("  {}", device.name);
        if let Some(factory) = &device.factory {
            println!("    Source:   {}", factory);
        }
        if !device.property.is_empty() {
            println!("    Property: {}", device.property);
        }
        for mode in &device.modes {
            println!("    Mode:     {}", mode);
        }
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing devices command: {:?}", args);

    let mut source = system_devices()?;
    let show_all = !args.video && !args.audio;

    let mut output = DevicesOutput::default();
    if show_all || args.video {
        output.cameras = list(source.as_mut(), VIDEO_CLASS, args.limit)?;
    }
    if show_all || args.audio {
        output.microphones = list(source.as_mut(), AUDIO_CLASS, args.limit)?;
    }

    if json {
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::General(format!("Failed to serialize JSON: {}", e)))?;
        println!("{}", json_str);
    } else {
        if show_all || args.video {
            print_group("Cameras", &output.cameras);
        }
        if show_all || args.audio {
            print_group("Microphones", &output.microphones);
        }
    }

    Ok(())
}
