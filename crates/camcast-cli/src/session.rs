// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Resolution of layered settings into one concrete streaming session.

use crate::config::{
    AudioArgs, SessionConfig, TargetArgs, VideoArgs, DEFAULT_AUDIO_PORT, DEFAULT_FORMAT,
    DEFAULT_FRAMERATE, DEFAULT_HOST, DEFAULT_RESOLUTION, DEFAULT_VIDEO_PORT,
};
use crate::error::CliError;
use crate::utils::device_from_flags;
use camcast::codec::{AudioCodec, Codec, LinuxH264Mode};
use camcast::device::{
    default_audio_source, default_video_source, resolve, DeviceDescriptor, PropertyFragment,
};
use camcast::modes::{parse_resolution, Mode};
use camcast::pipeline::{
    synthesize_audio, synthesize_video, AudioRequest, Endpoint, StageGraph, VideoRequest,
};
use camcast::platform::{detect_linux_variant, LinuxVariant, Platform};
use serde::Serialize;

/// Device class used for camera discovery and flag-described cameras.
pub const VIDEO_CLASS: &str = "Video/Source";
/// Device class used for microphone discovery and flag-described microphones.
pub const AUDIO_CLASS: &str = "Audio/Source";

/// Platform and board the pipelines are built for.
pub fn resolve_target(args: &TargetArgs) -> Result<(Platform, LinuxVariant), CliError> {
    let platform = match args.platform {
        Some(platform) => platform,
        None => Platform::current()?,
    };
    let variant = match (platform, args.variant) {
        (_, Some(variant)) => variant,
        (Platform::Linux, None) => detect_linux_variant(),
        (Platform::Darwin, None) => LinuxVariant::Generic,
    };
    log::debug!("Target: {} ({})", platform, variant);
    Ok((platform, variant))
}

fn port(value: Option<u16>, default: u16, what: &str) -> Result<u16, CliError> {
    match value.unwrap_or(default) {
        0 => Err(CliError::InvalidArgs(format!(
            "{} port must be between 1 and 65535",
            what
        ))),
        port => Ok(port),
    }
}

fn host(value: Option<&str>, default: &str, what: &str) -> Result<String, CliError> {
    let host = value.unwrap_or(default).trim();
    if host.is_empty() {
        return Err(CliError::InvalidArgs(format!("{} host is empty", what)));
    }
    Ok(host.to_string())
}

/// Capture mode from `--resolution`, `--format` and `--framerate`.
pub fn mode_from_args(args: &VideoArgs) -> Result<Mode, CliError> {
    let (width, height) = parse_resolution(args.resolution.as_deref().unwrap_or(DEFAULT_RESOLUTION))?;
    let format = args.format.as_deref().unwrap_or(DEFAULT_FORMAT);
    let framerate = args.framerate.as_deref().unwrap_or(DEFAULT_FRAMERATE);
    Ok(Mode::new(format, width, height, framerate)?)
}

/// Camera described by `--device-prop` and `--source`.
pub fn video_device(args: &VideoArgs) -> Result<DeviceDescriptor, CliError> {
    device_from_flags(VIDEO_CLASS, &args.device_props, args.source.as_deref())
}

/// Microphone described by `--audio-device-prop` and `--audio-source`.
pub fn audio_device(args: &AudioArgs) -> Result<DeviceDescriptor, CliError> {
    device_from_flags(
        AUDIO_CLASS,
        &args.audio_device_props,
        args.audio_source.as_deref(),
    )
}

/// The video leg inputs after defaults are applied.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSession {
    pub platform: Platform,
    pub variant: LinuxVariant,
    pub codec: Codec,
    /// Only meaningful when [`LinuxH264Mode::applies`].
    pub h264_mode: LinuxH264Mode,
    pub mode: Mode,
    pub source: String,
    pub device: PropertyFragment,
    pub endpoint: Endpoint,
}

impl VideoSession {
    /// Apply defaults to `args` for the given target and camera.
    ///
    /// `mode` overrides the mode flags, as when it was picked from the
    /// device's own capabilities.
    pub fn new(
        (platform, variant): (Platform, LinuxVariant),
        args: &VideoArgs,
        device: &DeviceDescriptor,
        mode: Option<Mode>,
    ) -> Result<VideoSession, CliError> {
        let mode = match mode {
            Some(mode) => mode,
            None => mode_from_args(args)?,
        };
        Ok(VideoSession {
            platform,
            variant,
            codec: args.codec.unwrap_or_default(),
            h264_mode: args
                .h264_mode
                .unwrap_or_else(|| LinuxH264Mode::default_for(variant)),
            mode,
            source: device
                .source_element(default_video_source(platform))
                .to_string(),
            device: resolve(device),
            endpoint: Endpoint::new(
                &host(args.host.as_deref(), DEFAULT_HOST, "Video")?,
                port(args.port, DEFAULT_VIDEO_PORT, "Video")?,
            ),
        })
    }

    pub fn request(&self) -> VideoRequest<'_> {
        VideoRequest {
            platform: self.platform,
            variant: self.variant,
            codec: self.codec,
            h264_mode: self.h264_mode,
            mode: &self.mode,
            device: &self.device,
            source: &self.source,
            endpoint: &self.endpoint,
        }
    }

    pub fn graph(&self) -> StageGraph {
        synthesize_video(&self.request())
    }
}

/// The audio leg inputs after defaults are applied.
#[derive(Debug, Clone, Serialize)]
pub struct AudioSession {
    pub platform: Platform,
    pub codec: AudioCodec,
    pub source: String,
    pub device: PropertyFragment,
    pub endpoint: Endpoint,
}

impl AudioSession {
    /// Apply defaults to `args`; the audio host falls back to `video_host`.
    pub fn new(
        platform: Platform,
        args: &AudioArgs,
        video_host: &str,
        device: &DeviceDescriptor,
    ) -> Result<AudioSession, CliError> {
        Ok(AudioSession {
            platform,
            codec: args.audio_codec.unwrap_or_default(),
            source: device
                .source_element(default_audio_source(platform))
                .to_string(),
            device: resolve(device),
            endpoint: Endpoint::new(
                &host(args.audio_host.as_deref(), video_host, "Audio")?,
                port(args.audio_port, DEFAULT_AUDIO_PORT, "Audio")?,
            ),
        })
    }

    pub fn request(&self) -> AudioRequest<'_> {
        AudioRequest {
            platform: self.platform,
            codec: self.codec,
            device: &self.device,
            source: &self.source,
            endpoint: &self.endpoint,
        }
    }

    pub fn graph(&self) -> StageGraph {
        synthesize_audio(&self.request())
    }
}

/// One pipeline of a session, ready for the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub label: &'static str,
    pub launch: String,
}

/// Both legs of a streaming session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub video: VideoSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioSession>,
}

impl Session {
    /// Resolve a session entirely from settings, describing devices by flags.
    pub fn from_config(config: &SessionConfig, with_audio: bool) -> Result<Session, CliError> {
        let target = resolve_target(&config.target)?;
        let video = VideoSession::new(target, &config.video, &video_device(&config.video)?, None)?;
        let audio = if with_audio {
            Some(AudioSession::new(
                target.0,
                &config.audio,
                &video.endpoint.host,
                &audio_device(&config.audio)?,
            )?)
        } else {
            None
        };
        Ok(Session { video, audio })
    }

    /// Launch text of each leg, video first.
    pub fn legs(&self) -> Vec<Leg> {
        let mut legs = vec![Leg {
            label: "video",
            launch: self.video.graph().to_string(),
        }];
        if let Some(audio) = &self.audio {
            legs.push(Leg {
                label: "audio",
                launch: audio.graph().to_string(),
            });
        }
        legs
    }
}
