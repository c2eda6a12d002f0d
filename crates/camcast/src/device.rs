// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Device descriptors and addressing property resolution.
//!
//! Discovery reports each capture device as a display name, a class, an
//! optional source element factory, a property mapping and a capability
//! set. The pipeline only needs one of those properties: the one that tells
//! the source element *which* device to open. [`resolve`] picks it.

use crate::caps::{CapsSet, Scalar, Structure};
use crate::modes::{self, Mode};
use crate::pipeline::{Prop, PropValue};
use crate::platform::Platform;
use serde::Serialize;
use std::fmt;

/// Properties consulted by [`resolve`], highest precedence first.
pub const PRECEDENCE: [&str; 5] = ["device", "path", "target-object", "node.id", "device-index"];

/// A capture device as reported by discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDescriptor {
    display_name: String,
    device_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    factory: Option<String>,
    properties: Structure,
    caps: CapsSet,
}

impl DeviceDescriptor {
    pub fn new(display_name: &str, device_class: &str) -> Self {
        DeviceDescriptor {
            display_name: display_name.to_string(),
            device_class: device_class.to_string(),
            factory: None,
            properties: Structure::new("properties"),
            caps: CapsSet::new(),
        }
    }

    /// Source element factory the device instantiates, e.g. `v4l2src`.
    pub fn with_factory(mut self, factory: &str) -> Self {
        self.factory = Some(factory.to_string());
        self
    }

    pub fn with_properties(mut self, properties: Structure) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_caps(mut self, caps: CapsSet) -> Self {
        self.caps = caps;
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn device_class(&self) -> &str {
        &self.device_class
    }

    pub fn factory(&self) -> Option<&str> {
        self.factory.as_deref()
    }

    pub fn properties(&self) -> &Structure {
        &self.properties
    }

    pub fn caps(&self) -> &CapsSet {
        &self.caps
    }

    /// Source element name: the device's own factory, else `default`.
    pub fn source_element<'a>(&'a self, default: &'a str) -> &'a str {
        self.factory.as_deref().filter(|f| !f.is_empty()).unwrap_or(default)
    }

    /// Capture modes advertised by this device.
    pub fn modes(&self, limit: usize) -> Vec<Mode> {
        modes::extract_modes(&self.caps, limit)
    }

    fn string_property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)?.flatten(Scalar::as_str).first() {
            Some(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    fn int_property(&self, key: &str) -> Option<i64> {
        self.properties.get(key)?.flatten(Scalar::as_int).first().copied()
    }
}

/// The addressing property of a device, possibly absent.
///
/// Renders as `key=value` (or nothing), ready to be placed among the
/// source element's properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFragment(Option<Prop>);

impl PropertyFragment {
    /// The fragment that addresses no particular device.
    pub fn empty() -> Self {
        PropertyFragment(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn prop(&self) -> Option<&Prop> {
        self.0.as_ref()
    }

    fn quoted(key: &str, value: String) -> Self {
        PropertyFragment(Some(Prop::new(key, PropValue::Quoted(value))))
    }
}

impl fmt::Display for PropertyFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(prop) => write!(f, "{}", prop),
            None => Ok(()),
        }
    }
}

impl Serialize for PropertyFragment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pick the addressing property of a device.
///
/// The first property of [`PRECEDENCE`] that is present wins. String
/// properties must be non-empty and are emitted quoted, `path` mapping to
/// `device` and `node.id` to `target-object`; `device-index` must be
/// non-negative and is emitted bare. Anything else yields the empty
/// fragment and the source element opens its default device.
///
/// ```
/// use camcast::caps::Structure;
/// use camcast::device::{resolve, DeviceDescriptor};
///
/// let props = Structure::new("properties")
///     .with_field("device-index", 0_i64)
///     .with_field("device", "/dev/video0");
/// let cam = DeviceDescriptor::new("USB camera", "Video/Source").with_properties(props);
/// assert_eq!(resolve(&cam).to_string(), "device=\"/dev/video0\"");
/// ```
pub fn resolve(device: &DeviceDescriptor) -> PropertyFragment {
    let fragment = if let Some(v) = device.string_property("device") {
        PropertyFragment::quoted("device", v)
    } else if let Some(v) = device.string_property("path") {
        PropertyFragment::quoted("device", v)
    } else if let Some(v) = device.string_property("target-object") {
        PropertyFragment::quoted("target-object", v)
    } else if let Some(v) = device.string_property("node.id") {
        PropertyFragment::quoted("target-object", v)
    } else if let Some(i) = device.int_property("device-index").filter(|&i| i >= 0) {
        PropertyFragment(Some(Prop::new("device-index", PropValue::Int(i))))
    } else {
        PropertyFragment::empty()
    };

    if fragment.is_empty() {
        log::debug!("{}: no addressing property", device.display_name());
    } else {
        log::debug!("{}: addressed by {}", device.display_name(), fragment);
    }
    fragment
}

/// Video source element used when the device names no factory.
pub fn default_video_source(platform: Platform) -> &'static str {
    match platform {
        Platform::Darwin => "avfvideosrc",
        Platform::Linux => "v4l2src",
    }
}

/// Audio source element used when the device names no factory.
pub fn default_audio_source(platform: Platform) -> &'static str {
    match platform {
        Platform::Darwin => "osxaudiosrc",
        Platform::Linux => "pipewiresrc",
    }
}
