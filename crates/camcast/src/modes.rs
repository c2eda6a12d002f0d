// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Capture modes and their extraction from capability sets.

use crate::caps::{CapsSet, Scalar};
use crate::fraction::Fraction;
use crate::Error;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Structure name of uncompressed video capabilities.
pub const RAW_VIDEO: &str = "video/x-raw";

/// Default cap on the number of modes offered for selection.
pub const DEFAULT_MODE_LIMIT: usize = 20;

/// Well-known resolutions offered when the device reports nothing usable.
///
/// `(width, height, label)`
pub const RESOLUTION_PRESETS: &[(u32, u32, &str)] = &[
    (640, 480, "640x480 (VGA 4:3)"),
    (1024, 768, "1024x768 (XGA 4:3)"),
    (1440, 1080, "1440x1080 (HD 4:3)"),
    (1280, 720, "1280x720 (HDTV 16:9)"),
    (1920, 1080, "1920x1080 (2K/FHD 16:9)"),
    (3840, 2160, "3840x2160 (4K/UHD 16:9)"),
];

/// Pixel formats offered for manual mode entry.
pub const FORMAT_PRESETS: &[&str] = &["NV12", "I420"];

/// A concrete capture mode.
///
/// Modes are immutable once built: width and height are positive and the
/// framerate is a canonical `N/D` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Mode {
    format: String,
    width: u32,
    height: u32,
    framerate: String,
}

impl Mode {
    /// Build a mode from explicit values.
    ///
    /// ```
    /// use camcast::modes::Mode;
    ///
    /// let mode = Mode::new("NV12", 1920, 1080, "30/1")?;
    /// assert_eq!(mode.to_string(), "1920x1080 30/1 NV12");
    /// assert!(Mode::new("NV12", 0, 1080, "30/1").is_err());
    /// # Ok::<(), camcast::Error>(())
    /// ```
    pub fn new(format: &str, width: u32, height: u32, framerate: &str) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidMode(format!(
                "dimensions must be positive: {}x{}",
                width, height
            )));
        }
        if format.trim().is_empty() {
            return Err(Error::InvalidMode("format must not be empty".to_string()));
        }
        let rate = Fraction::parse(framerate)?;
        if rate.denominator() < 0 {
            return Err(Error::InvalidMode(format!(
                "framerate denominator must be positive: {}",
                rate
            )));
        }
        Ok(Mode {
            format: format.trim().to_string(),
            width,
            height,
            framerate: rate.to_string(),
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn framerate(&self) -> &str {
        &self.framerate
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} {} {}",
            self.width, self.height, self.framerate, self.format
        )
    }
}

// Mode framerates keep the sign on the numerator only.
fn framerate(scalar: &Scalar) -> Option<String> {
    let text = scalar.as_fraction()?;
    let rate = Fraction::parse(&text).ok()?;
    (rate.denominator() > 0).then_some(text)
}

fn positive(scalar: &Scalar) -> Option<u32> {
    scalar
        .as_int()
        .and_then(|i| u32::try_from(i).ok())
        .filter(|&v| v > 0)
}

/// Flatten a capability set into at most `limit` distinct capture modes.
///
/// Only `video/x-raw` structures are considered, and a structure missing any
/// of `format`, `width`, `height` or `framerate` contributes nothing. Each
/// field is flattened independently, then the cross-product is walked with
/// format outermost and framerate innermost. Duplicates are skipped and the
/// walk stops as soon as `limit` modes have been collected, so the modes
/// kept are always the first ones in that order.
pub fn extract_modes(caps: &CapsSet, limit: usize) -> Vec<Mode> {
    let mut modes = Vec::new();
    if limit == 0 {
        return modes;
    }
    let mut seen = HashSet::new();

    for (index, st) in caps.structures().iter().enumerate() {
        if st.name() != RAW_VIDEO {
            log::trace!("skipping caps structure {} ({})", index, st.name());
            continue;
        }

        let formats = st
            .get("format")
            .map(|v| v.flatten(Scalar::as_str))
            .unwrap_or_default();
        let widths = st
            .get("width")
            .map(|v| v.flatten(positive))
            .unwrap_or_default();
        let heights = st
            .get("height")
            .map(|v| v.flatten(positive))
            .unwrap_or_default();
        let framerates = st
            .get("framerate")
            .map(|v| v.flatten(framerate))
            .unwrap_or_default();

        if formats.is_empty() || widths.is_empty() || heights.is_empty() || framerates.is_empty()
        {
            log::trace!("caps structure {} lacks an enumerable mode field", index);
            continue;
        }

        for format in &formats {
            for &width in &widths {
                for &height in &heights {
                    for framerate in &framerates {
                        let key = format!("{}|{}|{}|{}", format, width, height, framerate);
                        if !seen.insert(key) {
                            continue;
                        }
                        modes.push(Mode {
                            format: format.clone(),
                            width,
                            height,
                            framerate: framerate.clone(),
                        });
                        if modes.len() >= limit {
                            log::debug!("mode limit {} reached", limit);
                            return modes;
                        }
                    }
                }
            }
        }
    }

    log::debug!("extracted {} modes from {} structures", modes.len(), caps.len());
    modes
}

/// Like [`extract_modes`], but reports an empty result as
/// [`Error::NoCapabilityMatch`].
pub fn require_modes(caps: &CapsSet, limit: usize) -> Result<Vec<Mode>, Error> {
    let modes = extract_modes(caps, limit);
    if modes.is_empty() {
        return Err(Error::NoCapabilityMatch);
    }
    Ok(modes)
}

/// Parse resolution string in format "WxH"
///
/// ```
/// use camcast::modes::parse_resolution;
/// assert_eq!(parse_resolution("1920x1080").unwrap(), (1920, 1080));
/// ```
pub fn parse_resolution(s: &str) -> Result<(u32, u32), Error> {
    let invalid = || Error::InvalidMode(format!("invalid resolution (expected WxH): {}", s));

    let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.parse::<u32>().map_err(|_| invalid())?;
    let height = height.parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(Error::InvalidMode(format!(
            "resolution dimensions must be positive: {}",
            s
        )));
    }
    Ok((width, height))
}
