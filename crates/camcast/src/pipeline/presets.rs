// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Fixed per-branch parameters.
//!
//! These values are emitted verbatim into the generated pipelines. They are
//! tuned for the encoder elements of each board and are part of the output
//! contract, so change them only together with the receivers.

/// Buffers held by the queue in front of the encoder. One buffer keeps
/// latency at a single frame; older frames are dropped.
pub const ENCODER_QUEUE_BUFFERS: i64 = 1;

/// Buffers held between a hardware encoder's capsfilter and the payloader.
pub const PAYLOADER_QUEUE_BUFFERS: i64 = 3;

/// Intermediate format fed to software encoders.
pub const SOFTWARE_ENCODER_FORMAT: &str = "I420";

/// Format produced by vaapipostproc and consumed by the Pi and MPP encoders.
pub const HARDWARE_ENCODER_FORMAT: &str = "NV12";

/// Packed format requested from ROCK 5 and libcamera sources.
pub const PACKED_CAMERA_FORMAT: &str = "YUY2";

/// Memory features of VA-API surfaces.
pub const VA_SURFACE_MEMORY: &str = "memory:VASurface";

/// Memory features of Jetson NVMM buffers.
pub const NVMM_MEMORY: &str = "memory:NVMM";

/// `config-interval` that resends SPS/PPS with every IDR frame.
pub const CONFIG_INTERVAL_EVERY_IDR: i64 = -1;

/// `config-interval` of one second, used by the H265 payloader on Jetson and
/// ROCK 5.
pub const CONFIG_INTERVAL_ONE_SECOND: i64 = 1;

// Raspberry Pi / libcamera
pub const RASPI_H264_LEVEL: &str = "4.1";
pub const LIBCAMERA_EXTRA_CONTROLS: &str =
    "encode,h264_profile=4,h264_level=12,video_bitrate=20000000";

// Jetson
pub const JETSON_PRESET_LEVEL: i64 = 3;
pub const JETSON_H264_PROFILE: i64 = 4;
pub const JETSON_H265_PROFILE: i64 = 0;
pub const JETSON_H264_BITRATE: i64 = 20_000_000;
pub const JETSON_H265_BITRATE: i64 = 30_000_000;
pub const JETSON_VP8_BITRATE: i64 = 20_000_000;
pub const JETSON_VP9_BITRATE: i64 = 30_000_000;
pub const JETSON_LEVEL: &str = "4";

// ROCK 5
pub const MPP_H264_LEVEL: i64 = 40;
pub const MPP_H264_PROFILE: i64 = 100;

// Software encoders
pub const VPX_DEADLINE: i64 = 1;
pub const DARWIN_VP9_CPU_USED: i64 = 8;
pub const DARWIN_VP9_THREADS: i64 = 4;
pub const DARWIN_VP9_LAG_IN_FRAMES: i64 = 0;
pub const LINUX_VP9_CPU_USED: i64 = 4;

// Audio
pub const AUDIO_RATE: i64 = 48_000;
pub const AUDIO_CHANNELS: i64 = 2;
