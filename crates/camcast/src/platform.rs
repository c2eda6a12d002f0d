// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Host platform and Linux board classification

use crate::Error;
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, str::FromStr};

/// Device-tree file holding the board model string on ARM boards.
pub const DEFAULT_MODEL_PATH: &str = "/proc/device-tree/model";

/// Environment variable overriding [`DEFAULT_MODEL_PATH`].
pub const MODEL_PATH_ENV: &str = "CAMCAST_MODEL_PATH";

/// Operating system family the pipeline targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
}

impl Platform {
    /// Platform of the running build.
    ///
    /// Fails with [`Error::UnsupportedPlatform`] anywhere but macOS and Linux.
    pub fn current() -> Result<Self, Error> {
        Self::from_os(env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Self, Error> {
        match os {
            "macos" | "darwin" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "darwin" | "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Linux board family, each with its own hardware encoder vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinuxVariant {
    /// Desktop or unrecognised board (VA-API / software encoders)
    #[default]
    Generic,
    /// Raspberry Pi (v4l2 M2M encoder, libcamera)
    Raspi,
    /// NVIDIA Jetson Nano (nvv4l2 encoders, NVMM memory)
    Jetson,
    /// Radxa ROCK 5 (Rockchip MPP encoders)
    Rock5,
}

impl LinuxVariant {
    pub const ALL: [LinuxVariant; 4] = [
        LinuxVariant::Generic,
        LinuxVariant::Raspi,
        LinuxVariant::Jetson,
        LinuxVariant::Rock5,
    ];

    /// Classify a board from its model string.
    ///
    /// Checks are substring matches applied in a fixed order; anything
    /// inconclusive is [`LinuxVariant::Generic`].
    ///
    /// ```
    /// use camcast::platform::LinuxVariant;
    ///
    /// let model = "Raspberry Pi 4 Model B Rev 1.4";
    /// assert_eq!(LinuxVariant::classify(model), LinuxVariant::Raspi);
    /// assert_eq!(LinuxVariant::classify("QEMU"), LinuxVariant::Generic);
    /// ```
    pub fn classify(model: &str) -> Self {
        if model.contains("Raspberry Pi") {
            LinuxVariant::Raspi
        } else if model.contains("NVIDIA Jetson Nano") {
            LinuxVariant::Jetson
        } else if ["Radxa ROCK 5", "Rock 5", "ROCK 5"]
            .iter()
            .any(|needle| model.contains(needle))
        {
            LinuxVariant::Rock5
        } else {
            LinuxVariant::Generic
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LinuxVariant::Generic => "generic",
            LinuxVariant::Raspi => "raspi",
            LinuxVariant::Jetson => "jetson",
            LinuxVariant::Rock5 => "rock5",
        }
    }
}

impl fmt::Display for LinuxVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinuxVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinuxVariant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| Error::InvalidValue {
                kind: "linux variant",
                value: s.to_string(),
            })
    }
}

/// Path of the board model file, honouring [`MODEL_PATH_ENV`].
pub fn model_path() -> String {
    env::var(MODEL_PATH_ENV).unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Detect the Linux board family of this machine.
///
/// An unreadable model file is not an error: the board is then
/// [`LinuxVariant::Generic`].
pub fn detect_linux_variant() -> LinuxVariant {
    let path = model_path();
    match fs::read(&path) {
        Ok(bytes) => {
            // The device-tree string is NUL terminated.
            let model = String::from_utf8_lossy(&bytes);
            let variant = LinuxVariant::classify(model.trim_end_matches('\0'));
            log::debug!("board model {:?} classified as {}", model.trim_end_matches('\0'), variant);
            variant
        }
        Err(err) => {
            log::debug!("cannot read {}: {}, assuming generic", path, err);
            LinuxVariant::Generic
        }
    }
}

/// Detect platform and, on Linux, the board family.
pub fn detect() -> Result<(Platform, LinuxVariant), Error> {
    let platform = Platform::current()?;
    let variant = match platform {
        Platform::Linux => detect_linux_variant(),
        Platform::Darwin => LinuxVariant::Generic,
    };
    Ok((platform, variant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            LinuxVariant::classify("Raspberry Pi 5 Model B Rev 1.0"),
            LinuxVariant::Raspi
        );
        assert_eq!(
            LinuxVariant::classify("NVIDIA Jetson Nano Developer Kit"),
            LinuxVariant::Jetson
        );
        assert_eq!(
            LinuxVariant::classify("Radxa ROCK 5 Model B"),
            LinuxVariant::Rock5
        );
        assert_eq!(LinuxVariant::classify("Rock 5 ITX"), LinuxVariant::Rock5);
        assert_eq!(
            LinuxVariant::classify("NVIDIA Jetson Xavier NX"),
            LinuxVariant::Generic
        );
        assert_eq!(LinuxVariant::classify(""), LinuxVariant::Generic);
        // raspi is checked first
        assert_eq!(
            LinuxVariant::classify("Raspberry Pi ROCK 5 clone"),
            LinuxVariant::Raspi
        );
    }

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Darwin);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert!(matches!(
            Platform::from_os("windows"),
            Err(Error::UnsupportedPlatform(os)) if os == "windows"
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for variant in LinuxVariant::ALL {
            assert_eq!(variant.to_string().parse::<LinuxVariant>().unwrap(), variant);
        }
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::Darwin);
        assert!("freebsd".parse::<Platform>().is_err());
        assert!("pi".parse::<LinuxVariant>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&LinuxVariant::Rock5).unwrap(),
            "\"rock5\""
        );
        let p: Platform = serde_json::from_str("\"linux\"").unwrap();
        assert_eq!(p, Platform::Linux);
    }
}
