//! CAN Error Types

use thiserror::Error;

/// Errors that can occur on the CAN interface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanError {
    /// Peripheral could not be brought up
    #[error("CAN initialization failed: {0}")]
    InitFailed(String),

    /// Operation before the peripheral was started
    #[error("CAN peripheral not initialized")]
    NotInitialized,

    /// Controller is bus-off, transmit rejected
    #[error("CAN bus off")]
    BusOff,

    /// Identifier outside the 11-bit range
    #[error("CAN ID 0x{0:X} exceeds 11 bits")]
    InvalidId(u16),

    /// Payload longer than 8 bytes
    #[error("Invalid CAN data length: {0}")]
    InvalidLength(usize),

    /// Frame is not a telemetry frame
    #[error("Not a telemetry frame: expected ID 0x{expected:03X}, got 0x{actual:03X}")]
    NotTelemetry { expected: u16, actual: u16 },

    /// Telemetry payload too short
    #[error("Telemetry frame too short: {0} bytes")]
    TelemetryTooShort(usize),

    /// Receive notifications were already enabled
    #[error("CAN receive notifications already enabled")]
    AlreadyEnabled,
}
