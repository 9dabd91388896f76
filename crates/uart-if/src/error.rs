//! UART Error Types

use thiserror::Error;

/// Errors raised by a character transport
#[derive(Debug, Error)]
pub enum UartError {
    /// Host I/O failure
    #[error("UART I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened or configured
    #[error("Serial port error: {0}")]
    Serial(String),

    /// A receive callback is already installed
    #[error("UART receive callback already registered")]
    RxAlreadyRegistered,

    /// Transmit rejected by the driver
    #[error("UART transmit failed")]
    TransmitFailed,
}

impl From<tokio_serial::Error> for UartError {
    fn from(err: tokio_serial::Error) -> Self {
        UartError::Serial(err.to_string())
    }
}
