// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Session settings shared by command-line flags and JSON session files.
//!
//! Every setting is optional so that flags, a `--config` file and the
//! built-in defaults can be layered: flags win over the file, the file wins
//! over the defaults. Defaults are applied in [`crate::session`].

use crate::error::CliError;
use camcast::codec::{AudioCodec, Codec, LinuxH264Mode};
use camcast::platform::{LinuxVariant, Platform};
use clap::Args as ClapArgs;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default video destination host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default video destination port
pub const DEFAULT_VIDEO_PORT: u16 = 5000;
/// Default audio destination port
pub const DEFAULT_AUDIO_PORT: u16 = 5001;
/// Default capture resolution
pub const DEFAULT_RESOLUTION: &str = "640x480";
/// Default capture pixel format
pub const DEFAULT_FORMAT: &str = "NV12";
/// Default capture framerate
pub const DEFAULT_FRAMERATE: &str = "30/1";

/// Target overrides; detected from the host when absent.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetArgs {
    /// Target platform (darwin, linux) [default: this host]
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Linux board (generic, raspi, jetson, rock5) [default: detected]
    #[arg(long)]
    pub variant: Option<LinuxVariant>,
}

/// Video leg settings.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoArgs {
    /// Video UDP destination host [default: 127.0.0.1]
    #[arg(long)]
    pub host: Option<String>,

    /// Video UDP destination port [default: 5000]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Video codec (H264, H265, VP8, VP9, AV1) [default: H264]
    #[arg(short, long)]
    pub codec: Option<Codec>,

    /// H264 path on generic/raspi Linux (vaapi, raspi-v4l2, libcamera, camera-h264)
    #[arg(long)]
    pub h264_mode: Option<LinuxH264Mode>,

    /// Capture resolution in WxH format [default: 640x480]
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Capture pixel format [default: NV12]
    #[arg(short, long)]
    pub format: Option<String>,

    /// Capture framerate as N/D [default: 30/1]
    #[arg(short = 'F', long)]
    pub framerate: Option<String>,

    /// Video source element [default: avfvideosrc or v4l2src]
    #[arg(long)]
    pub source: Option<String>,

    /// Camera property as KEY=VALUE (device, path, target-object, node.id, device-index)
    #[arg(long = "device-prop", value_name = "KEY=VALUE")]
    pub device_props: Vec<String>,
}

/// Audio leg settings.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioArgs {
    /// Audio UDP destination host [default: video host]
    #[arg(long)]
    pub audio_host: Option<String>,

    /// Audio UDP destination port [default: 5001]
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub audio_port: Option<u16>,

    /// Audio codec (OPUS, PCMU) [default: OPUS]
    #[arg(long)]
    pub audio_codec: Option<AudioCodec>,

    /// Audio source element [default: osxaudiosrc or pipewiresrc]
    #[arg(long)]
    pub audio_source: Option<String>,

    /// Microphone property as KEY=VALUE
    #[arg(long = "audio-device-prop", value_name = "KEY=VALUE")]
    pub audio_device_props: Vec<String>,
}

/// Complete session settings, as stored in a session file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub target: TargetArgs,
    #[serde(flatten)]
    pub video: VideoArgs,
    #[serde(flatten)]
    pub audio: AudioArgs,
}

fn either<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    if first.is_empty() {
        second
    } else {
        first
    }
}

impl TargetArgs {
    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: TargetArgs) -> TargetArgs {
        TargetArgs {
            platform: self.platform.or(fallback.platform),
            variant: self.variant.or(fallback.variant),
        }
    }
}

impl VideoArgs {
    pub fn or(self, fallback: VideoArgs) -> VideoArgs {
        VideoArgs {
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            codec: self.codec.or(fallback.codec),
            h264_mode: self.h264_mode.or(fallback.h264_mode),
            resolution: self.resolution.or(fallback.resolution),
            format: self.format.or(fallback.format),
            framerate: self.framerate.or(fallback.framerate),
            source: self.source.or(fallback.source),
            device_props: either(self.device_props, fallback.device_props),
        }
    }
}

impl AudioArgs {
    pub fn or(self, fallback: AudioArgs) -> AudioArgs {
        AudioArgs {
            audio_host: self.audio_host.or(fallback.audio_host),
            audio_port: self.audio_port.or(fallback.audio_port),
            audio_codec: self.audio_codec.or(fallback.audio_codec),
            audio_source: self.audio_source.or(fallback.audio_source),
            audio_device_props: either(self.audio_device_props, fallback.audio_device_props),
        }
    }
}

impl SessionConfig {
    /// Load a JSON session file.
    pub fn load(path: &Path) -> Result<SessionConfig, CliError> {
        let file = File::open(path).map_err(|e| {
            CliError::InvalidArgs(format!("Cannot open config {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CliError::InvalidArgs(format!("Invalid config {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Layer `self` (flags) over `fallback` (file).
    pub fn or(self, fallback: SessionConfig) -> SessionConfig {
        SessionConfig {
            target: self.target.or(fallback.target),
            video: self.video.or(fallback.video),
            audio: self.audio.or(fallback.audio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_file() {
        let json = r#"{
            "platform": "linux",
            "variant": "raspi",
            "codec": "H265",
            "h264_mode": "libcamera",
            "port": 6000,
            "device_props": ["device=/dev/video0"],
            "audio_codec": "PCMU"
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.target.platform, Some(Platform::Linux));
        assert_eq!(config.target.variant, Some(LinuxVariant::Raspi));
        assert_eq!(config.video.codec, Some(Codec::H265));
        assert_eq!(config.video.h264_mode, Some(LinuxH264Mode::Libcamera));
        assert_eq!(config.video.port, Some(6000));
        assert_eq!(config.video.device_props, vec!["device=/dev/video0"]);
        assert_eq!(config.audio.audio_codec, Some(AudioCodec::Pcmu));
        assert_eq!(config.video.host, None);
    }

    #[test]
    fn test_empty_session_file() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let flags = SessionConfig {
            video: VideoArgs {
                port: Some(7000),
                ..Default::default()
            },
            ..Default::default()
        };
        let file = SessionConfig {
            video: VideoArgs {
                host: Some("10.0.0.5".into()),
                port: Some(6000),
                device_props: vec!["device=/dev/video1".into()],
                ..Default::default()
            },
            audio: AudioArgs {
                audio_port: Some(6001),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.video.port, Some(7000));
        assert_eq!(merged.video.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(merged.video.device_props, vec!["device=/dev/video1"]);
        assert_eq!(merged.audio.audio_port, Some(6001));
    }
}
