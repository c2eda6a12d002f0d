// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Capture device discovery.

use crate::error::CliError;
use camcast::device::DeviceDescriptor;

/// A provider of capture devices.
pub trait DeviceSource {
    /// Devices of `class` (`Video/Source`, `Audio/Source`).
    ///
    /// An empty result is [`camcast::Error::NoDevicesFound`].
    fn devices(&mut self, class: &str) -> Result<Vec<DeviceDescriptor>, CliError>;
}

/// Devices described up front, such as from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct FixedDevices {
    devices: Vec<DeviceDescriptor>,
}

impl FixedDevices {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        FixedDevices { devices }
    }
}

impl DeviceSource for FixedDevices {
    fn devices(&mut self, class: &str) -> Result<Vec<DeviceDescriptor>, CliError> {
        let devices: Vec<DeviceDescriptor> = self
            .devices
            .iter()
            .filter(|d| d.device_class() == class)
            .cloned()
            .collect();
        if devices.is_empty() {
            return Err(camcast::Error::NoDevicesFound(class.to_string()).into());
        }
        Ok(devices)
    }
}

#[cfg(feature = "gstreamer")]
pub use monitor::GstDeviceSource;

/// The device source of this build, if it can discover devices at all.
#[cfg(feature = "gstreamer")]
pub fn system_devices() -> Result<Box<dyn DeviceSource>, CliError> {
    Ok(Box::new(GstDeviceSource::new()?))
}

/// The device source of this build, if it can discover devices at all.
#[cfg(not(feature = "gstreamer"))]
pub fn system_devices() -> Result<Box<dyn DeviceSource>, CliError> {
    Err(CliError::Unsupported(
        "device discovery requires camcast built with the gstreamer feature".to_string(),
    ))
}

#[cfg(feature = "gstreamer")]
mod monitor {
    use super::DeviceSource;
    use crate::error::CliError;
    use camcast::caps::{parse_caps, parse_structure, CapValue, CapsSet, Structure};
    use camcast::device::{DeviceDescriptor, PRECEDENCE};
    use gstreamer::prelude::*;

    /// Raw capability filter paired with each device class.
    pub(super) fn class_filter(class: &str) -> &'static str {
        if class.starts_with("Audio/") {
            "audio/x-raw"
        } else {
            "video/x-raw"
        }
    }

    /// Devices reported by the GStreamer device monitor.
    #[derive(Debug)]
    pub struct GstDeviceSource;

    impl GstDeviceSource {
        pub fn new() -> Result<Self, CliError> {
            gstreamer::init().map_err(|e| {
                CliError::RuntimeUnavailable(format!("Failed to initialize GStreamer: {}", e))
            })?;
            Ok(GstDeviceSource)
        }
    }

    /// Fill in addressing properties missing from `parsed` with the typed
    /// values of `props`.
    pub(super) fn with_addressing(
        props: &gstreamer::StructureRef,
        mut parsed: Structure,
    ) -> Structure {
        for key in PRECEDENCE {
            if parsed.get(key).is_some() {
                continue;
            }
            let value = if key == "device-index" {
                props.get::<i32>(key).ok().map(|i| CapValue::from(i64::from(i)))
            } else {
                props.get::<String>(key).ok().map(|s| CapValue::from(s.as_str()))
            };
            if let Some(value) = value {
                log::trace!("{} read from typed device properties", key);
                parsed.insert(key, value);
            }
        }
        parsed
    }

    fn describe(device: &gstreamer::Device) -> DeviceDescriptor {
        let name = device.display_name();
        let mut descriptor = DeviceDescriptor::new(&name, &device.device_class());

        if let Some(caps) = device.caps() {
            match parse_caps(&caps.to_string()) {
                Ok(caps) => descriptor = descriptor.with_caps(caps),
                Err(e) => {
                    log::warn!("{}: unreadable caps: {}", name, e);
                    descriptor = descriptor.with_caps(CapsSet::new());
                }
            }
        }

        if let Some(props) = device.properties() {
            let parsed = match parse_structure(&props.to_string()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("{}: unreadable properties: {}", name, e);
                    Structure::new("properties")
                }
            };
            descriptor = descriptor.with_properties(with_addressing(&props, parsed));
        }

        match device.create_element(None) {
            Ok(element) => {
                if let Some(factory) = element.factory() {
                    descriptor = descriptor.with_factory(&factory.name());
                }
            }
            Err(e) => log::debug!("{}: cannot create source element: {}", name, e),
        }

        descriptor
    }

    impl DeviceSource for GstDeviceSource {
        fn devices(&mut self, class: &str) -> Result<Vec<DeviceDescriptor>, CliError> {
            let monitor = gstreamer::DeviceMonitor::new();
            let filter = gstreamer::Caps::builder(class_filter(class)).build();
            monitor.add_filter(Some(class), Some(&filter));
            monitor.start().map_err(|e| {
                CliError::RuntimeUnavailable(format!("Failed to start device monitor: {}", e))
            })?;
            let devices: Vec<DeviceDescriptor> = monitor.devices().iter().map(describe).collect();
            monitor.stop();

            log::debug!("Found {} device(s) for {}", devices.len(), class);
            if devices.is_empty() {
                return Err(camcast::Error::NoDevicesFound(class.to_string()).into());
            }
            Ok(devices)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "gstreamer"))]
    #[test]
    fn test_discovery_unsupported() {
        assert!(matches!(system_devices(), Err(CliError::Unsupported(_))));
    }

    #[cfg(feature = "gstreamer")]
    #[test]
    fn test_class_filter() {
        assert_eq!(monitor::class_filter("Video/Source"), "video/x-raw");
        assert_eq!(monitor::class_filter("Audio/Source"), "audio/x-raw");
    }

    #[test]
    fn test_fixed_devices_by_class() {
        let mut source = FixedDevices::new(vec![
            DeviceDescriptor::new("cam", "Video/Source"),
            DeviceDescriptor::new("mic", "Audio/Source"),
        ]);
        let video = source.devices("Video/Source").unwrap();
        assert_eq!(video.len(), 1);
        assert_eq!(video[0].display_name(), "cam");

        let mut source = FixedDevices::new(vec![DeviceDescriptor::new("cam", "Video/Source")]);
        assert!(matches!(
            source.devices("Audio/Source"),
            Err(CliError::DeviceNotFound(_))
        ));
    }

    #[cfg(feature = "gstreamer")]
    #[test]
    fn test_typed_addressing_properties() {
        use camcast::caps::{CapValue, Structure};
        use camcast::device::resolve;

        gstreamer::init().unwrap();
        let props = gstreamer::Structure::builder("pipewire-proplist")
            .field("node.id", "42")
            .field("device-index", 3_i32)
            .build();

        // unparseable text leaves nothing but the typed values
        let filled = monitor::with_addressing(&props, Structure::new("properties"));
        assert_eq!(filled.get("node.id"), Some(&CapValue::from("42")));
        assert_eq!(filled.get("device-index"), Some(&CapValue::from(3_i64)));
        let mic = DeviceDescriptor::new("mic", "Audio/Source").with_properties(filled);
        assert_eq!(resolve(&mic).to_string(), "target-object=\"42\"");

        // parsed values are kept
        let parsed = Structure::new("properties").with_field("node.id", "7");
        let filled = monitor::with_addressing(&props, parsed);
        assert_eq!(filled.get("node.id"), Some(&CapValue::from("7")));
    }

    #[cfg(feature = "gstreamer")]
    #[test]
    #[ignore = "requires GStreamer device providers"]
    fn test_gst_device_source() {
        let mut source = GstDeviceSource::new().unwrap();
        match source.devices("Video/Source") {
            Ok(devices) => assert!(devices.iter().all(|d| d.device_class().contains("Video"))),
            Err(e) => assert!(matches!(e, CliError::DeviceNotFound(_))),
        }
    }
}
