//! # Serial Communication Module
//!
//! Handles the UART link from the CRSF receiver.
//!
//! This module handles:
//! - Opening the receiver port at 420,000 baud, 8N1
//! - Auto-detecting the device when no port is configured
//! - Feeding received bytes to the decoder (see [`receiver`])

pub mod port_trait;
pub mod receiver;

pub use port_trait::{SerialPortIO, TokioSerialPort};
pub use receiver::CrsfReceiver;

use crate::error::{CrsfRxError, Result};
use tracing::{debug, info, warn};

pub use crate::crsf::protocol::CRSF_BAUD_RATE;

/// Receiver device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyUSB0", // USB-to-serial adapters
    "/dev/ttyACM0", // USB CDC devices
    "/dev/ttyAMA0", // On-board UART (Raspberry Pi)
];

/// Serial connection to a CRSF receiver
pub struct CrsfSerial {
    port: tokio_serial::SerialStream,
    device_path: String,
}

impl std::fmt::Debug for CrsfSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrsfSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl CrsfSerial {
    /// Open the receiver port
    ///
    /// # Arguments
    ///
    /// * `port` - Device path, or empty to auto-detect
    /// * `baud_rate` - UART speed, normally [`CRSF_BAUD_RATE`]
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crsf_rx::serial::{CrsfSerial, CRSF_BAUD_RATE};
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let serial = CrsfSerial::open("", CRSF_BAUD_RATE)?;
    ///     println!("Receiver on {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(port: &str, baud_rate: u32) -> Result<Self> {
        if port.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, baud_rate)
        } else {
            Self::open_with_paths(&[port], baud_rate)
        }
    }

    /// Open the first device path that succeeds
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Opened CRSF receiver at {} ({} baud)", path, baud_rate);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(CrsfRxError::SerialPortNotFound(paths.join(", ")))
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        use tokio_serial::SerialPortBuilderExt;

        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| CrsfRxError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Hand the stream over to a [`CrsfReceiver`]
    pub fn into_port(self) -> TokioSerialPort {
        TokioSerialPort::new(self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(CRSF_BAUD_RATE, 420_000);
        assert_eq!(DEFAULT_DEVICE_PATHS.len(), 3);
        assert_eq!(DEFAULT_DEVICE_PATHS[0], "/dev/ttyUSB0");
    }

    #[test]
    fn test_open_with_invalid_paths_returns_error() {
        let invalid_paths = &["/dev/nonexistent0", "/dev/nonexistent1"];
        let result = CrsfSerial::open_with_paths(invalid_paths, CRSF_BAUD_RATE);

        match result.unwrap_err() {
            CrsfRxError::SerialPortNotFound(msg) => {
                assert!(msg.contains("/dev/nonexistent0"));
                assert!(msg.contains("/dev/nonexistent1"));
            }
            other => panic!("Expected SerialPortNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_with_empty_paths_returns_error() {
        let empty_paths: &[&str] = &[];
        let result = CrsfSerial::open_with_paths(empty_paths, CRSF_BAUD_RATE);

        assert!(matches!(result, Err(CrsfRxError::SerialPortNotFound(_))));
    }

    #[test]
    fn test_open_explicit_port_only_tries_that_port() {
        let result = CrsfSerial::open("/dev/nonexistent_crsf_rx", CRSF_BAUD_RATE);

        match result.unwrap_err() {
            CrsfRxError::SerialPortNotFound(msg) => {
                assert_eq!(msg, "/dev/nonexistent_crsf_rx");
            }
            other => panic!("Expected SerialPortNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_open_port_with_invalid_path_returns_error() {
        let result = CrsfSerial::open_port("/dev/nonexistent_serial_device_12345", CRSF_BAUD_RATE);

        match result.unwrap_err() {
            CrsfRxError::Serial(msg) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    // Integration test - only runs if a receiver is connected
    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_open_with_real_hardware() {
        match CrsfSerial::open("", CRSF_BAUD_RATE) {
            Ok(serial) => {
                println!("Opened CRSF receiver at: {}", serial.device_path());
                assert!(DEFAULT_DEVICE_PATHS.contains(&serial.device_path()));
            }
            Err(_) => println!("No CRSF receiver detected (this is OK for CI/CD)"),
        }
    }
}
