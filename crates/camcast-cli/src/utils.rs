// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::error::CliError;
use camcast::caps::{CapValue, Structure};
use camcast::device::DeviceDescriptor;
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Parse a `KEY=VALUE` device property.
///
/// Values are kept as strings, so numeric ids such as `node.id=42` still
/// address the device. Only `device-index` is read as an integer.
pub fn parse_device_prop(s: &str) -> Result<(String, CapValue), CliError> {
    let (key, value) = s.split_once('=').ok_or_else(|| {
        CliError::InvalidArgs(format!("Device property must be KEY=VALUE: {}", s))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidArgs(format!(
            "Device property name is empty: {}",
            s
        )));
    }

    let value = match (key, value.trim().parse::<i64>()) {
        ("device-index", Ok(i)) => CapValue::from(i),
        _ => CapValue::from(value),
    };
    Ok((key.to_string(), value))
}

/// Describe a device from command-line properties and an optional source
/// element.
pub fn device_from_flags(
    class: &str,
    props: &[String],
    source: Option<&str>,
) -> Result<DeviceDescriptor, CliError> {
    let mut properties = Structure::new("properties");
    for prop in props {
        let (key, value) = parse_device_prop(prop)?;
        properties.insert(&key, value);
    }

    let mut device = DeviceDescriptor::new("command line", class).with_properties(properties);
    if let Some(source) = source {
        device = device.with_factory(source);
    }
    Ok(device)
}

/// Install signal handler for graceful shutdown on Ctrl+C
///
/// Returns an Arc<AtomicBool> that will be set to true when SIGINT is received.
pub fn install_signal_handler() -> Result<Arc<AtomicBool>, CliError> {
    let term = Arc::new(AtomicBool::new(false));

    flag::register(SIGINT, Arc::clone(&term))
        .map_err(|e| CliError::General(format!("Failed to register signal handler: {}", e)))?;

    log::debug!("Installed SIGINT handler");
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camcast::device::resolve;

    #[test]
    fn test_parse_device_prop() {
        assert_eq!(
            parse_device_prop("device=/dev/video0").unwrap(),
            ("device".to_string(), CapValue::from("/dev/video0"))
        );
        assert_eq!(
            parse_device_prop("device-index=1").unwrap(),
            ("device-index".to_string(), CapValue::from(1_i64))
        );
        // only the first '=' splits
        assert_eq!(
            parse_device_prop("target-object=a=b").unwrap().1,
            CapValue::from("a=b")
        );
    }

    #[test]
    fn test_numeric_ids_stay_strings() {
        assert_eq!(
            parse_device_prop("node.id=42").unwrap().1,
            CapValue::from("42")
        );

        let props = vec!["node.id=42".to_string()];
        let mic = device_from_flags("Audio/Source", &props, None).unwrap();
        assert_eq!(resolve(&mic).to_string(), "target-object=\"42\"");

        let props = vec!["target-object=57".to_string()];
        let mic = device_from_flags("Audio/Source", &props, None).unwrap();
        assert_eq!(resolve(&mic).to_string(), "target-object=\"57\"");
    }

    #[test]
    fn test_parse_device_prop_invalid() {
        assert!(parse_device_prop("device").is_err());
        assert!(parse_device_prop("=x").is_err());
    }

    #[test]
    fn test_device_from_flags() {
        let props = vec!["device-index=0".to_string(), "path=/dev/video2".to_string()];
        let device = device_from_flags("Video/Source", &props, Some("v4l2src")).unwrap();
        assert_eq!(device.factory(), Some("v4l2src"));
        assert_eq!(resolve(&device).to_string(), "device=\"/dev/video2\"");

        let device = device_from_flags("Video/Source", &["device-index=1".into()], None).unwrap();
        assert_eq!(resolve(&device).to_string(), "device-index=1");

        let device = device_from_flags("Video/Source", &[], None).unwrap();
        assert!(resolve(&device).is_empty());
        assert_eq!(device.source_element("avfvideosrc"), "avfvideosrc");
    }
}
