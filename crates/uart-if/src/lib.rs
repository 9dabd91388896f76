//! UART Character Transport
//!
//! The command line talks to the outside world through [`CharTransport`]:
//! a blocking transmit plus an interrupt-style single-byte receive that the
//! receiver must re-arm after every byte.

mod error;
mod mock;
mod serial;
mod stdio;
mod transport;

pub use error::UartError;
pub use mock::MockUart;
pub use serial::SerialUart;
pub use stdio::StdioUart;
pub use transport::{CharTransport, RxArm, RxByteCallback};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Device name selecting the process stdin/stdout
pub const STDIO_DEVICE: &str = "stdio";

/// UART configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UartConfig {
    /// Serial device path, or "stdio"
    pub device: String,
    /// Baud rate (ignored for stdio)
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            device: STDIO_DEVICE.to_string(),
            baud_rate: 115200,
        }
    }
}

/// Open the transport described by `config`
pub fn open_transport(config: &UartConfig) -> Result<Arc<dyn CharTransport>, UartError> {
    if config.device == STDIO_DEVICE {
        info!("Using stdio as CLI transport");
        return Ok(Arc::new(StdioUart::new()));
    }

    let port = SerialUart::open(&config.device, config.baud_rate)?;
    Ok(Arc::new(port))
}
