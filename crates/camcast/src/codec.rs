// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::platform::{LinuxVariant, Platform};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Video codec of the outgoing RTP stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Codec {
    #[default]
    H264,
    H265,
    VP8,
    VP9,
    AV1,
}

impl Codec {
    /// Menu order.
    pub const ALL: [Codec; 5] = [Codec::H264, Codec::H265, Codec::VP8, Codec::VP9, Codec::AV1];

    pub fn name(&self) -> &'static str {
        match self {
            Codec::H264 => "H264",
            Codec::H265 => "H265",
            Codec::VP8 => "VP8",
            Codec::VP9 => "VP9",
            Codec::AV1 => "AV1",
        }
    }

    /// Menu label naming the encoder this codec maps to on the given target.
    pub fn label(&self, platform: Platform, variant: LinuxVariant) -> &'static str {
        match (platform, self) {
            (_, Codec::VP8) => "VP8 (vp8enc)",
            (_, Codec::VP9) => "VP9 (vp9enc)",
            (_, Codec::AV1) => "AV1 (svtav1enc)",
            (Platform::Darwin, Codec::H264) => "H264 (vtenc_h264_hw)",
            (Platform::Darwin, Codec::H265) => "H265 (vtenc_h265_hw)",
            (Platform::Linux, Codec::H264) => match variant {
                LinuxVariant::Jetson => "H264 (nvv4l2h264enc)",
                LinuxVariant::Rock5 => "H264 (mpph264enc)",
                _ => "H264 (vaapih264enc or variant-specific)",
            },
            (Platform::Linux, Codec::H265) => match variant {
                LinuxVariant::Jetson => "H265 (nvv4l2h265enc)",
                LinuxVariant::Rock5 => "H265 (mpph265enc)",
                _ => "H265 (vaapih265enc)",
            },
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidValue {
                kind: "codec",
                value: s.to_string(),
            })
    }
}

/// Audio codec of the outgoing RTP stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioCodec {
    #[default]
    Opus,
    /// G.711 mu-law
    Pcmu,
}

impl AudioCodec {
    pub const ALL: [AudioCodec; 2] = [AudioCodec::Opus, AudioCodec::Pcmu];

    pub fn name(&self) -> &'static str {
        match self {
            AudioCodec::Opus => "OPUS",
            AudioCodec::Pcmu => "PCMU",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioCodec::Opus => "Opus (rtpopuspay)",
            AudioCodec::Pcmu => "G.711 PCMU (rtppcmupay)",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioCodec::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidValue {
                kind: "audio codec",
                value: s.to_string(),
            })
    }
}

/// How H264 is produced on generic and Raspberry Pi Linux boards.
///
/// Ignored on Jetson and ROCK 5, which have their own encoders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinuxH264Mode {
    /// vaapipostproc into vaapih264enc, zero-copy from the camera
    #[default]
    Vaapi,
    /// Raspberry Pi v4l2h264enc M2M encoder
    RaspiV4l2,
    /// libcamerasrc source into v4l2h264enc
    Libcamera,
    /// Camera already emits H264; parse and payload only
    CameraH264,
}

impl LinuxH264Mode {
    pub const ALL: [LinuxH264Mode; 4] = [
        LinuxH264Mode::Vaapi,
        LinuxH264Mode::RaspiV4l2,
        LinuxH264Mode::Libcamera,
        LinuxH264Mode::CameraH264,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LinuxH264Mode::Vaapi => "vaapi",
            LinuxH264Mode::RaspiV4l2 => "raspi-v4l2",
            LinuxH264Mode::Libcamera => "libcamera",
            LinuxH264Mode::CameraH264 => "camera-h264",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinuxH264Mode::Vaapi => "VAAPI (vaapipostproc + vaapih264enc)",
            LinuxH264Mode::RaspiV4l2 => "Raspberry Pi v4l2h264enc",
            LinuxH264Mode::Libcamera => "libcamerasrc + v4l2h264enc",
            LinuxH264Mode::CameraH264 => "Camera H264 passthrough",
        }
    }

    /// Preferred mode for a board: the Pi encoder on Raspberry Pi, VA-API
    /// everywhere else.
    pub fn default_for(variant: LinuxVariant) -> Self {
        match variant {
            LinuxVariant::Raspi => LinuxH264Mode::RaspiV4l2,
            _ => LinuxH264Mode::Vaapi,
        }
    }

    /// Menu order for a board, default first.
    pub fn menu(variant: LinuxVariant) -> [LinuxH264Mode; 4] {
        match variant {
            LinuxVariant::Raspi => [
                LinuxH264Mode::RaspiV4l2,
                LinuxH264Mode::Vaapi,
                LinuxH264Mode::Libcamera,
                LinuxH264Mode::CameraH264,
            ],
            _ => Self::ALL,
        }
    }

    /// Whether a sub-mode choice applies to this target at all.
    pub fn applies(platform: Platform, variant: LinuxVariant, codec: Codec) -> bool {
        platform == Platform::Linux && codec == Codec::H264 && variant != LinuxVariant::Jetson
    }
}

impl fmt::Display for LinuxH264Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinuxH264Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinuxH264Mode::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::InvalidValue {
                kind: "linux h264 mode",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_parse() {
        assert_eq!("H264".parse::<Codec>().unwrap(), Codec::H264);
        assert_eq!("vp9".parse::<Codec>().unwrap(), Codec::VP9);
        assert!(matches!(
            "mpeg2".parse::<Codec>(),
            Err(Error::InvalidValue { kind: "codec", .. })
        ));
        assert_eq!("pcmu".parse::<AudioCodec>().unwrap(), AudioCodec::Pcmu);
        assert_eq!(
            "raspi-v4l2".parse::<LinuxH264Mode>().unwrap(),
            LinuxH264Mode::RaspiV4l2
        );
        assert!("raspi".parse::<LinuxH264Mode>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Codec::H264.label(Platform::Linux, LinuxVariant::Jetson),
            "H264 (nvv4l2h264enc)"
        );
        assert_eq!(
            Codec::H265.label(Platform::Linux, LinuxVariant::Rock5),
            "H265 (mpph265enc)"
        );
        assert_eq!(
            Codec::H264.label(Platform::Darwin, LinuxVariant::Generic),
            "H264 (vtenc_h264_hw)"
        );
        assert_eq!(
            Codec::AV1.label(Platform::Linux, LinuxVariant::Raspi),
            "AV1 (svtav1enc)"
        );
    }

    #[test]
    fn test_h264_mode_menu() {
        assert_eq!(
            LinuxH264Mode::default_for(LinuxVariant::Raspi),
            LinuxH264Mode::RaspiV4l2
        );
        assert_eq!(
            LinuxH264Mode::default_for(LinuxVariant::Generic),
            LinuxH264Mode::Vaapi
        );
        assert_eq!(
            LinuxH264Mode::menu(LinuxVariant::Raspi)[1],
            LinuxH264Mode::Vaapi
        );
        for variant in LinuxVariant::ALL {
            assert_eq!(
                LinuxH264Mode::menu(variant)[0],
                LinuxH264Mode::default_for(variant)
            );
        }
    }

    #[test]
    fn test_h264_mode_applies() {
        assert!(LinuxH264Mode::applies(
            Platform::Linux,
            LinuxVariant::Raspi,
            Codec::H264
        ));
        assert!(!LinuxH264Mode::applies(
            Platform::Linux,
            LinuxVariant::Jetson,
            Codec::H264
        ));
        assert!(!LinuxH264Mode::applies(
            Platform::Darwin,
            LinuxVariant::Generic,
            Codec::H264
        ));
        assert!(!LinuxH264Mode::applies(
            Platform::Linux,
            LinuxVariant::Generic,
            Codec::VP8
        ));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Codec::AV1).unwrap(), "\"AV1\"");
        assert_eq!(
            serde_json::to_string(&AudioCodec::Pcmu).unwrap(),
            "\"PCMU\""
        );
        assert_eq!(
            serde_json::to_string(&LinuxH264Mode::CameraH264).unwrap(),
            "\"camera-h264\""
        );
    }
}
