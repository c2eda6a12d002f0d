// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments or configuration values
    InvalidArgs(String),
    /// No capture device matched the request
    DeviceNotFound(String),
    /// Pipeline runtime could not be started (missing launcher or plugin)
    RuntimeUnavailable(String),
    /// A running pipeline reported an error or exited unsuccessfully
    PipelineFailed(String),
    /// Host platform or feature not supported by this build
    Unsupported(String),
    /// General error
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            CliError::RuntimeUnavailable(msg) => write!(f, "Runtime unavailable: {}", msg),
            CliError::PipelineFailed(msg) => write!(f, "Pipeline failed: {}", msg),
            CliError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidArgs(_) => ExitCode::from(2),
            CliError::DeviceNotFound(_) => ExitCode::from(3),
            CliError::RuntimeUnavailable(_) => ExitCode::from(4),
            CliError::PipelineFailed(_) => ExitCode::from(5),
            CliError::Unsupported(_) => ExitCode::from(6),
            CliError::General(_) => ExitCode::from(1),
        }
    }
}

/// Map camcast::Error to CliError with appropriate exit codes
impl From<camcast::Error> for CliError {
    fn from(err: camcast::Error) -> Self {
        use camcast::Error;

        match err {
            // Bad user input
            Error::InvalidFraction(_)
            | Error::InvalidMode(_)
            | Error::InvalidValue { .. }
            | Error::CapsSyntax { .. } => CliError::InvalidArgs(err.to_string()),

            Error::NoDevicesFound(class) => {
                CliError::DeviceNotFound(format!("no devices found for {}", class))
            }
            Error::NoCapabilityMatch => CliError::DeviceNotFound(err.to_string()),
            Error::UnsupportedPlatform(os) => {
                CliError::Unsupported(format!("unsupported OS: {}", os))
            }

            Error::Io(io_err) => match io_err.kind() {
                std::io::ErrorKind::NotFound => {
                    CliError::RuntimeUnavailable(format!("Not found: {}", io_err))
                }
                std::io::ErrorKind::PermissionDenied => {
                    CliError::DeviceNotFound(format!("Permission denied: {}", io_err))
                }
                _ => CliError::General(format!("I/O error: {}", io_err)),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::from(camcast::Error::Io(err))
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::InvalidArgs("test".into()).exit_code(),
            ExitCode::from(2)
        );
        assert_eq!(
            CliError::DeviceNotFound("test".into()).exit_code(),
            ExitCode::from(3)
        );
        assert_eq!(
            CliError::RuntimeUnavailable("test".into()).exit_code(),
            ExitCode::from(4)
        );
        assert_eq!(
            CliError::PipelineFailed("test".into()).exit_code(),
            ExitCode::from(5)
        );
        assert_eq!(
            CliError::Unsupported("test".into()).exit_code(),
            ExitCode::from(6)
        );
        assert_eq!(
            CliError::General("test".into()).exit_code(),
            ExitCode::from(1)
        );
    }

    #[test]
    fn test_error_display() {
        let err = CliError::DeviceNotFound("/dev/video0".to_string());
        assert_eq!(format!("{}", err), "Device not found: /dev/video0");
    }

    #[test]
    fn test_library_error_mapping() {
        let err = CliError::from(camcast::Error::InvalidFraction("30".into()));
        assert!(matches!(err, CliError::InvalidArgs(_)));

        let err = CliError::from(camcast::Error::NoDevicesFound("Audio/Source".into()));
        assert_eq!(err.to_string(), "Device not found: no devices found for Audio/Source");

        let err = CliError::from(camcast::Error::UnsupportedPlatform("windows".into()));
        assert!(matches!(err, CliError::Unsupported(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gst-launch-1.0");
        assert!(matches!(CliError::from(io), CliError::RuntimeUnavailable(_)));
    }
}
