use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while discovering or reading one-wire sensors.
///
/// Discovery errors (`Activation*`, `DeviceDirectory`, `NoDevices`, `Id*`,
/// `UnrecognizedFamily`) abort `load_devices` without returning any device.
/// Read errors (`CrcMismatch`, `EofWithoutData`, `InvalidSample`) abort a
/// `read_devices` pass at the failing device; devices before it keep their
/// fresh reading.
#[derive(Debug, Error)]
pub enum OneWireError {
    #[error("Failed to run driver activation for {module}: {source}")]
    ActivationSpawn {
        module: String,
        #[source]
        source: subprocess::PopenError,
    },

    #[error("Driver activation for {module} exited with {status}: {stderr}")]
    ActivationFailed {
        module: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to list one wire devices in {}: {source}", path.display())]
    DeviceDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Files in {}: no devices found", path.display())]
    NoDevices { path: PathBuf },

    #[error("Error reading {} device id: {source}", path.display())]
    IdUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error decoding {} device id: fewer than 8 bytes", path.display())]
    IdTooShort { path: PathBuf },

    #[error("Error decoding {} device id: unrecognized one wire family code {code:#x}", path.display())]
    UnrecognizedFamily { path: PathBuf, code: u8 },

    #[error("CRC mismatch on read from {device}")]
    CrcMismatch { device: String },

    #[error("EOF without data from {device}")]
    EofWithoutData {
        device: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Invalid temperature sample from {device}: {source}")]
    InvalidSample {
        device: String,
        #[source]
        source: ParseIntError,
    },
}

impl OneWireError {
    /// True for the errors that `read_devices` can return.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            OneWireError::CrcMismatch { .. }
                | OneWireError::EofWithoutData { .. }
                | OneWireError::InvalidSample { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OneWireError>;
