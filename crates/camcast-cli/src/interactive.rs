// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Interactive session setup.
//!
//! Walks the user through the same questions as the flags, in this order:
//! video destination, codec, Linux H264 path, camera, capture mode, then
//! audio destination, codec and microphone.

use crate::config::{SessionConfig, DEFAULT_AUDIO_PORT, DEFAULT_HOST, DEFAULT_VIDEO_PORT};
use crate::discovery::DeviceSource;
use crate::error::CliError;
use crate::prompt::Prompter;
use crate::session::{resolve_target, AudioSession, Session, VideoSession, AUDIO_CLASS, VIDEO_CLASS};
use camcast::codec::{AudioCodec, Codec, LinuxH264Mode};
use camcast::device::DeviceDescriptor;
use camcast::modes::{Mode, DEFAULT_MODE_LIMIT, FORMAT_PRESETS, RESOLUTION_PRESETS};
use camcast::platform::{LinuxVariant, Platform};
use std::io::{BufRead, Write};

pub fn choose_codec<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    platform: Platform,
    variant: LinuxVariant,
) -> Result<Codec, CliError> {
    let labels: Vec<&str> = Codec::ALL
        .iter()
        .map(|c| c.label(platform, variant))
        .collect();
    let idx = prompter.choose("Select a codec", &labels)?;
    Ok(Codec::ALL[idx])
}

pub fn choose_h264_mode<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    variant: LinuxVariant,
) -> Result<LinuxH264Mode, CliError> {
    let menu = LinuxH264Mode::menu(variant);
    let labels: Vec<&str> = menu.iter().map(|m| m.label()).collect();
    let idx = prompter.choose("Select Linux H264 mode", &labels)?;
    Ok(menu[idx])
}

pub fn choose_audio_codec<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<AudioCodec, CliError> {
    let labels: Vec<&str> = AudioCodec::ALL.iter().map(|c| c.label()).collect();
    let idx = prompter.choose("Select an audio codec", &labels)?;
    Ok(AudioCodec::ALL[idx])
}

pub fn choose_device<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    source: &mut dyn DeviceSource,
    class: &str,
    title: &str,
) -> Result<DeviceDescriptor, CliError> {
    let mut devices = source.devices(class)?;
    let names: Vec<&str> = devices.iter().map(|d| d.display_name()).collect();
    let idx = prompter.choose(title, &names)?;
    Ok(devices.swap_remove(idx))
}

fn choose_format<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<String, CliError> {
    let mut labels = FORMAT_PRESETS.to_vec();
    labels.push("Custom");
    let idx = prompter.choose("Select a format", &labels)?;
    match FORMAT_PRESETS.get(idx) {
        Some(format) => Ok(format.to_string()),
        None => prompter.string("Format", FORMAT_PRESETS[0]),
    }
}

/// Resolution, format and framerate from the preset menus.
pub fn enter_mode<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    device: &DeviceDescriptor,
) -> Result<Mode, CliError> {
    let mut labels: Vec<&str> = RESOLUTION_PRESETS.iter().map(|&(_, _, l)| l).collect();
    labels.push("Custom (enter width/height)");
    let idx = prompter.choose("Select a resolution", &labels)?;
    let (width, height) = match RESOLUTION_PRESETS.get(idx) {
        Some(&(w, h, _)) => (w, h),
        None => (
            prompter.positive("Width", 640)?,
            prompter.positive("Height", 480)?,
        ),
    };

    let format = choose_format(prompter)?;
    let framerate = prompter.fraction("Framerate (num/den)", "30/1")?;
    if !device.caps().is_empty() {
        prompter.note("Note: chosen resolution may not be supported by the device caps.")?;
    }
    Ok(Mode::new(&format, width, height, &framerate)?)
}

/// A mode the device advertises, or a manually entered one.
pub fn choose_mode<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    device: &DeviceDescriptor,
) -> Result<Mode, CliError> {
    let mut modes = device.modes(DEFAULT_MODE_LIMIT);
    if modes.is_empty() {
        log::debug!("{}: no usable modes in caps", device.display_name());
        return enter_mode(prompter, device);
    }

    let mut labels: Vec<String> = modes.iter().map(Mode::to_string).collect();
    labels.push("Other (choose resolution, format and framerate)".to_string());
    let idx = prompter.choose("Select a capture mode", &labels)?;
    if idx < modes.len() {
        return Ok(modes.swap_remove(idx));
    }
    enter_mode(prompter, device)
}

/// Ask every session question; `config` supplies the target and the
/// defaults shown for host and port prompts.
pub fn gather<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    devices: &mut dyn DeviceSource,
    config: &SessionConfig,
    with_audio: bool,
) -> Result<Session, CliError> {
    let (platform, variant) = resolve_target(&config.target)?;

    let mut video_args = config.video.clone();
    let host = prompter.string(
        "Video UDP host",
        config.video.host.as_deref().unwrap_or(DEFAULT_HOST),
    )?;
    let port = prompter.port(
        "Video UDP port",
        config.video.port.unwrap_or(DEFAULT_VIDEO_PORT),
    )?;
    let codec = choose_codec(prompter, platform, variant)?;
    if LinuxH264Mode::applies(platform, variant, codec) {
        video_args.h264_mode = Some(choose_h264_mode(prompter, variant)?);
    }
    let camera = choose_device(prompter, devices, VIDEO_CLASS, "Select a camera")?;
    let mode = choose_mode(prompter, &camera)?;

    video_args.host = Some(host.clone());
    video_args.port = Some(port);
    video_args.codec = Some(codec);
    let video = VideoSession::new((platform, variant), &video_args, &camera, Some(mode))?;

    if !with_audio {
        return Ok(Session { video, audio: None });
    }

    let mut audio_args = config.audio.clone();
    let audio_host = prompter.string(
        "Audio UDP host",
        config.audio.audio_host.as_deref().unwrap_or(&host),
    )?;
    let audio_port = prompter.port(
        "Audio UDP port",
        config.audio.audio_port.unwrap_or(DEFAULT_AUDIO_PORT),
    )?;
    let audio_codec = choose_audio_codec(prompter)?;
    let microphone = choose_device(prompter, devices, AUDIO_CLASS, "Select an audio device")?;

    audio_args.audio_host = Some(audio_host);
    audio_args.audio_port = Some(audio_port);
    audio_args.audio_codec = Some(audio_codec);
    let audio = AudioSession::new(platform, &audio_args, &host, &microphone)?;

    Ok(Session {
        video,
        audio: Some(audio),
    })
}
