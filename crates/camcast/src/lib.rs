// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! camcast - capture-mode extraction and streaming pipeline synthesis
//!
//! This crate turns a handful of high-level choices (platform, hardware
//! variant, codec, capture mode and device identity) into a complete,
//! launch-ready pipeline description for an RTP-over-UDP sender. The text is
//! handed verbatim to the streaming runtime; camcast never executes it.
//!
//! # Quick Start
//!
//! ## Extracting capture modes from device capabilities
//!
//! ```
//! use camcast::caps::parse_caps;
//! use camcast::modes::extract_modes;
//!
//! let caps = parse_caps(
//!     "video/x-raw, format=(string){ NV12, I420 }, width=(int)1280, \
//!      height=(int)720, framerate=(fraction){ 30/1, 15/1 }",
//! )?;
//! let modes = extract_modes(&caps, 20);
//! assert_eq!(modes.len(), 4);
//! assert_eq!(modes[0].to_string(), "1280x720 30/1 NV12");
//! # Ok::<(), camcast::Error>(())
//! ```
//!
//! ## Synthesizing the video leg
//!
//! ```
//! use camcast::codec::{Codec, LinuxH264Mode};
//! use camcast::device::PropertyFragment;
//! use camcast::modes::Mode;
//! use camcast::pipeline::{synthesize_video, Endpoint, VideoRequest};
//! use camcast::platform::{LinuxVariant, Platform};
//!
//! let mode = Mode::new("NV12", 1920, 1080, "30/1")?;
//! let request = VideoRequest {
//!     platform: Platform::Darwin,
//!     variant: LinuxVariant::Generic,
//!     codec: Codec::H264,
//!     h264_mode: LinuxH264Mode::Vaapi,
//!     mode: &mode,
//!     device: &PropertyFragment::empty(),
//!     source: "avfvideosrc",
//!     endpoint: &Endpoint::new("127.0.0.1", 5000),
//! };
//! let text = synthesize_video(&request).to_string();
//! assert!(text.contains("vtenc_h264_hw realtime=true"));
//! assert!(text.ends_with("udpsink host=127.0.0.1 port=5000 sync=false async=false"));
//! # Ok::<(), camcast::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`fraction`] - framerate token validation
//! - [`caps`] - capability model and its text parser
//! - [`modes`] - capture modes and their extraction from capabilities
//! - [`device`] - device descriptors and addressing property resolution
//! - [`platform`] / [`codec`] - the closed input enumerations
//! - [`pipeline`] - the stage graph model and the synthesis tables

use std::{error, fmt, io};

/// Error type for camcast operations
#[derive(Debug)]
pub enum Error {
    /// Framerate text is not a valid `numerator/denominator` token
    InvalidFraction(String),

    /// A capability set produced no capture modes
    ///
    /// Not fatal: callers usually fall back to manual mode entry.
    NoCapabilityMatch,

    /// The host operating system is neither darwin nor linux
    UnsupportedPlatform(String),

    /// Device discovery returned nothing for the requested class
    NoDevicesFound(String),

    /// Mode values out of range (zero width or height)
    InvalidMode(String),

    /// A name that does not belong to one of the closed enumerations
    InvalidValue {
        /// Enumeration being parsed (e.g. "codec")
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// Capability or structure text that could not be parsed
    CapsSyntax {
        /// Byte offset into the input where parsing stopped
        position: usize,
        /// What the parser expected
        message: String,
    },

    /// I/O error while reading platform information
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidFraction(text) => {
                write!(f, "invalid fraction {:?}: expected numerator/denominator", text)
            }
            Error::NoCapabilityMatch => write!(f, "no capture modes found in device capabilities"),
            Error::UnsupportedPlatform(os) => write!(f, "unsupported OS: {}", os),
            Error::NoDevicesFound(class) => write!(f, "no devices found for {}", class),
            Error::InvalidMode(msg) => write!(f, "invalid mode: {}", msg),
            Error::InvalidValue { kind, value } => write!(f, "unknown {} {:?}", kind, value),
            Error::CapsSyntax { position, message } => {
                write!(f, "caps syntax error at offset {}: {}", position, message)
            }
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// The fraction module validates framerate tokens.
pub mod fraction;

/// The caps module models capability sets and parses their text form.
pub mod caps;

/// The modes module provides capture modes and their extraction.
pub mod modes;

/// The device module resolves the device addressing property.
pub mod device;

/// The platform module classifies the host platform and Linux board.
pub mod platform;

/// The codec module defines the video and audio codec enumerations.
pub mod codec;

/// The pipeline module synthesizes stage graph text for both legs.
pub mod pipeline;
