// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use super::presets::*;
use super::{leaky_queue, Caps, Element, Endpoint, PropValue, StageGraph};
use crate::codec::{Codec, LinuxH264Mode};
use crate::device::PropertyFragment;
use crate::modes::{Mode, RAW_VIDEO};
use crate::platform::{LinuxVariant, Platform};

/// Inputs of the video leg.
#[derive(Debug, Clone, Copy)]
pub struct VideoRequest<'a> {
    pub platform: Platform,
    /// Ignored on darwin.
    pub variant: LinuxVariant,
    pub codec: Codec,
    /// Only consulted for H264 on generic and raspi boards.
    pub h264_mode: LinuxH264Mode,
    pub mode: &'a Mode,
    pub device: &'a PropertyFragment,
    /// Source element factory; `libcamerasrc` replaces it in that mode.
    pub source: &'a str,
    pub endpoint: &'a Endpoint,
}

/// One row of the video synthesis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoBranch {
    /// macOS VideoToolbox H264
    VtencH264,
    /// macOS VideoToolbox H265
    VtencH265,
    DarwinVp8,
    DarwinVp9,
    DarwinAv1,
    /// VA-API post-processing and encoder, dmabuf import from the camera
    VaapiH264,
    VaapiH265,
    /// Raspberry Pi stateful M2M encoder
    RaspiV4l2H264,
    /// libcamera source into the Pi encoder
    LibcameraH264,
    /// Camera produces H264 itself
    CameraH264,
    SoftwareVp8,
    SoftwareVp9,
    SoftwareAv1,
    JetsonH264,
    JetsonH265,
    JetsonVp8,
    JetsonVp9,
    /// Rockchip MPP
    MppH264,
    MppH265,
    MppVp8,
}

/// Pick the table row for a request.
///
/// Jetson AV1 and ROCK 5 VP9/AV1 have no hardware encoder and take the
/// generic software row.
pub fn select_video_branch(
    platform: Platform,
    variant: LinuxVariant,
    codec: Codec,
    h264_mode: LinuxH264Mode,
) -> VideoBranch {
    use LinuxVariant::*;
    use VideoBranch::*;

    match (platform, variant, codec) {
        (Platform::Darwin, _, Codec::H264) => VtencH264,
        (Platform::Darwin, _, Codec::H265) => VtencH265,
        (Platform::Darwin, _, Codec::VP8) => DarwinVp8,
        (Platform::Darwin, _, Codec::VP9) => DarwinVp9,
        (Platform::Darwin, _, Codec::AV1) => DarwinAv1,

        (Platform::Linux, Jetson, Codec::H264) => JetsonH264,
        (Platform::Linux, Jetson, Codec::H265) => JetsonH265,
        (Platform::Linux, Jetson, Codec::VP8) => JetsonVp8,
        (Platform::Linux, Jetson, Codec::VP9) => JetsonVp9,

        (Platform::Linux, Rock5, Codec::H264) => MppH264,
        (Platform::Linux, Rock5, Codec::H265) => MppH265,
        (Platform::Linux, Rock5, Codec::VP8) => MppVp8,

        (Platform::Linux, Generic | Raspi, Codec::H264) => match h264_mode {
            LinuxH264Mode::Vaapi => VaapiH264,
            LinuxH264Mode::RaspiV4l2 => RaspiV4l2H264,
            LinuxH264Mode::Libcamera => LibcameraH264,
            LinuxH264Mode::CameraH264 => CameraH264,
        },
        (Platform::Linux, Generic | Raspi, Codec::H265) => VaapiH265,
        (Platform::Linux, Generic | Raspi, Codec::VP8) => SoftwareVp8,
        (Platform::Linux, Generic | Raspi | Rock5, Codec::VP9) => SoftwareVp9,
        (Platform::Linux, _, Codec::AV1) => SoftwareAv1,
    }
}

/// Build the video leg.
///
/// Always succeeds; the result ends in a UDP sink for `req.endpoint`.
pub fn synthesize_video(req: &VideoRequest) -> StageGraph {
    let branch = select_video_branch(req.platform, req.variant, req.codec, req.h264_mode);
    log::debug!(
        "video {} on {}/{}: {:?}",
        req.codec,
        req.platform,
        req.variant,
        branch
    );
    branch.build(req)
}

fn mode_caps(caps: Caps, mode: &Mode) -> Caps {
    caps.field("width", mode.width())
        .field("height", mode.height())
        .field("framerate", mode.framerate())
}

fn level_filter(media: &str, level: &str) -> Element {
    let caps = Caps::new(media).field("level", format!("(string){}", level));
    Element::new("capsfilter").prop("caps", PropValue::Caps(caps))
}

fn rtp_h264() -> Element {
    Element::new("rtph264pay")
        .int("config-interval", CONFIG_INTERVAL_EVERY_IDR)
        .string("aggregate-mode", "zero-latency")
}

fn rtp_h265(config_interval: i64) -> Element {
    Element::new("rtph265pay")
        .int("config-interval", config_interval)
        .string("aggregate-mode", "zero-latency")
}

impl VideoBranch {
    fn build(self, req: &VideoRequest) -> StageGraph {
        use VideoBranch::*;

        let mode = req.mode;
        let mut g = StageGraph::new();

        // Source element and caps negotiation
        match self {
            VtencH264 | VtencH265 => {
                g.push(darwin_source(req));
                g.push(mode_caps(Caps::new(RAW_VIDEO), mode).field("format", mode.format()));
            }
            DarwinVp8 | DarwinVp9 | DarwinAv1 => {
                g.push(darwin_source(req));
                g.push(mode_caps(Caps::new(RAW_VIDEO), mode));
                software_convert(&mut g);
            }
            VaapiH264 | VaapiH265 => {
                g.push(dmabuf_source(req));
                g.push(Element::new("vaapipostproc"));
                let caps = Caps::new(RAW_VIDEO)
                    .features(VA_SURFACE_MEMORY)
                    .field("format", HARDWARE_ENCODER_FORMAT);
                g.push(mode_caps(caps, mode));
            }
            RaspiV4l2H264 => {
                g.push(dmabuf_source(req));
                g.push(
                    mode_caps(Caps::new(RAW_VIDEO), mode).field("format", HARDWARE_ENCODER_FORMAT),
                );
            }
            LibcameraH264 => {
                g.push(Element::new("libcamerasrc").fragment(req.device));
                g.push(
                    mode_caps(Caps::new(RAW_VIDEO), mode)
                        .field("format", PACKED_CAMERA_FORMAT)
                        .field("interlace-mode", "progressive"),
                );
            }
            CameraH264 => {
                g.push(
                    Element::new(req.source)
                        .flag("do-timestamp", true)
                        .fragment(req.device),
                );
                g.push(
                    mode_caps(Caps::new("video/x-h264"), mode)
                        .field("stream-format", "byte-stream"),
                );
            }
            SoftwareVp8 | SoftwareVp9 | SoftwareAv1 => {
                g.push(dmabuf_source(req));
                g.push(mode_caps(Caps::new(RAW_VIDEO), mode));
                software_convert(&mut g);
            }
            JetsonH264 | JetsonH265 | JetsonVp8 | JetsonVp9 => {
                g.push(Element::new(req.source).fragment(req.device));
                g.push(mode_caps(Caps::new(RAW_VIDEO).features(NVMM_MEMORY), mode));
            }
            MppH264 | MppH265 | MppVp8 => {
                g.push(Element::new(req.source).fragment(req.device));
                g.push(mode_caps(Caps::new(RAW_VIDEO), mode).field("format", PACKED_CAMERA_FORMAT));
                g.push(Element::new("videoconvert"));
                g.push(Caps::new(RAW_VIDEO).field("format", HARDWARE_ENCODER_FORMAT));
            }
        }

        // The libcamera chain feeds the encoder directly.
        if self != LibcameraH264 {
            g.push(leaky_queue(ENCODER_QUEUE_BUFFERS));
        }

        // Encoder, parser and payloader
        match self {
            VtencH264 => {
                g.push(Element::new("vtenc_h264_hw").flag("realtime", true));
                g.push(Element::new("h264parse"));
                g.push(rtp_h264());
            }
            VtencH265 => {
                g.push(
                    Element::new("vtenc_h265_hw")
                        .flag("realtime", true)
                        .flag("allow-frame-reordering", false),
                );
                g.push(Element::new("h265parse"));
                g.push(rtp_h265(CONFIG_INTERVAL_EVERY_IDR));
            }
            DarwinVp8 | SoftwareVp8 => {
                g.push(Element::new("vp8enc").int("deadline", VPX_DEADLINE));
                g.push(Element::new("rtpvp8pay"));
            }
            DarwinVp9 => {
                g.push(
                    Element::new("vp9enc")
                        .int("deadline", VPX_DEADLINE)
                        .int("cpu-used", DARWIN_VP9_CPU_USED)
                        .int("threads", DARWIN_VP9_THREADS)
                        .int("lag-in-frames", DARWIN_VP9_LAG_IN_FRAMES),
                );
                g.push(Element::new("vp9parse"));
                g.push(Element::new("rtpvp9pay"));
            }
            SoftwareVp9 => {
                g.push(
                    Element::new("vp9enc")
                        .int("deadline", VPX_DEADLINE)
                        .int("cpu-used", LINUX_VP9_CPU_USED),
                );
                g.push(Element::new("vp9parse"));
                g.push(Element::new("rtpvp9pay"));
            }
            DarwinAv1 | SoftwareAv1 => {
                g.push(Element::new("svtav1enc"));
                g.push(Element::new("av1parse"));
                g.push(Element::new("rtpav1pay"));
            }
            VaapiH264 => {
                g.push(Element::new("vaapih264enc"));
                g.push(Element::new("h264parse"));
                g.push(rtp_h264());
            }
            VaapiH265 => {
                g.push(Element::new("vaapih265enc"));
                g.push(Element::new("h265parse"));
                g.push(rtp_h265(CONFIG_INTERVAL_EVERY_IDR));
            }
            RaspiV4l2H264 => {
                g.push(
                    Element::new("v4l2h264enc")
                        .string("capture-io-mode", "dmabuf")
                        .string("output-io-mode", "dmabuf"),
                );
                g.push(level_filter("video/x-h264", RASPI_H264_LEVEL));
                g.push(leaky_queue(PAYLOADER_QUEUE_BUFFERS));
                g.push(rtp_h264());
            }
            LibcameraH264 => {
                g.push(Element::new("v4l2h264enc").prop(
                    "extra-controls",
                    PropValue::Quoted(LIBCAMERA_EXTRA_CONTROLS.to_string()),
                ));
                g.push(level_filter("video/x-h264", RASPI_H264_LEVEL));
                g.push(leaky_queue(PAYLOADER_QUEUE_BUFFERS));
                g.push(rtp_h264());
            }
            CameraH264 => {
                g.push(Element::new("h264parse"));
                g.push(rtp_h264());
            }
            JetsonH264 => {
                g.push(
                    Element::new("nvv4l2h264enc")
                        .int("preset-level", JETSON_PRESET_LEVEL)
                        .int("profile", JETSON_H264_PROFILE)
                        .int("bitrate", JETSON_H264_BITRATE),
                );
                g.push(level_filter("video/x-h264", JETSON_LEVEL));
                g.push(leaky_queue(PAYLOADER_QUEUE_BUFFERS));
                g.push(rtp_h264());
            }
            JetsonH265 => {
                g.push(
                    Element::new("nvv4l2h265enc")
                        .int("preset-level", JETSON_PRESET_LEVEL)
                        .int("profile", JETSON_H265_PROFILE)
                        .int("bitrate", JETSON_H265_BITRATE),
                );
                g.push(level_filter("video/x-h265", JETSON_LEVEL));
                g.push(leaky_queue(PAYLOADER_QUEUE_BUFFERS));
                g.push(rtp_h265(CONFIG_INTERVAL_ONE_SECOND));
            }
            JetsonVp8 => {
                g.push(Element::new("nvv4l2vp8enc").int("bitrate", JETSON_VP8_BITRATE));
                g.push(Element::new("rtpvp8pay"));
            }
            JetsonVp9 => {
                g.push(Element::new("nvv4l2vp9enc").int("bitrate", JETSON_VP9_BITRATE));
                g.push(Element::new("rtpvp9pay"));
            }
            MppH264 => {
                g.push(
                    Element::new("mpph264enc")
                        .int("level", MPP_H264_LEVEL)
                        .int("profile", MPP_H264_PROFILE),
                );
                g.push(rtp_h264());
            }
            MppH265 => {
                g.push(Element::new("mpph265enc"));
                g.push(rtp_h265(CONFIG_INTERVAL_ONE_SECOND));
            }
            MppVp8 => {
                g.push(Element::new("mppvp8enc"));
                g.push(Element::new("rtpvp8pay"));
            }
        }

        g.push(req.endpoint.sink());
        g
    }

    /// Codec this row encodes.
    pub fn codec(self) -> Codec {
        use VideoBranch::*;

        match self {
            VtencH264 | VaapiH264 | RaspiV4l2H264 | LibcameraH264 | CameraH264 | JetsonH264
            | MppH264 => Codec::H264,
            VtencH265 | VaapiH265 | JetsonH265 | MppH265 => Codec::H265,
            DarwinVp8 | SoftwareVp8 | JetsonVp8 | MppVp8 => Codec::VP8,
            DarwinVp9 | SoftwareVp9 | JetsonVp9 => Codec::VP9,
            DarwinAv1 | SoftwareAv1 => Codec::AV1,
        }
    }
}

fn darwin_source(req: &VideoRequest) -> Element {
    Element::new(req.source)
        .flag("do-stats", true)
        .flag("do-timestamp", true)
        .fragment(req.device)
}

fn dmabuf_source(req: &VideoRequest) -> Element {
    Element::new(req.source)
        .flag("do-timestamp", true)
        .fragment(req.device)
        .string("io-mode", "dmabuf")
}

fn software_convert(g: &mut StageGraph) {
    g.push(Element::new("videoconvert"));
    g.push(Caps::new(RAW_VIDEO).field("format", SOFTWARE_ENCODER_FORMAT));
}
