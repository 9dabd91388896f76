//! Stdio Character Transport

use crate::transport::{CharTransport, RxArm, RxByteCallback};
use crate::UartError;
use std::io::{self, Read, Write};
use std::sync::Arc;
use tracing::{debug, warn};

/// Character transport over the process stdin/stdout
///
/// A dedicated reader thread plays the role of the UART receive interrupt.
pub struct StdioUart {
    rx: Arc<RxArm>,
}

impl StdioUart {
    /// Create the transport (the reader starts on first arm)
    pub fn new() -> Self {
        Self {
            rx: Arc::new(RxArm::new()),
        }
    }
}

impl Default for StdioUart {
    fn default() -> Self {
        Self::new()
    }
}

impl CharTransport for StdioUart {
    fn transmit_blocking(&self, bytes: &[u8]) -> Result<(), UartError> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()?;
        Ok(())
    }

    fn receive_one_byte_async(&self, callback: RxByteCallback) -> Result<(), UartError> {
        self.rx.register(callback)?;

        let rx = Arc::clone(&self.rx);
        std::thread::Builder::new()
            .name("uart-rx".to_string())
            .spawn(move || {
                for byte in io::stdin().lock().bytes() {
                    match byte {
                        Ok(b) => {
                            rx.deliver(b);
                        }
                        Err(e) => {
                            warn!("stdin read failed: {}", e);
                            return;
                        }
                    }
                }
                debug!("stdin closed, UART receive stopped");
            })?;

        Ok(())
    }

    fn rearm_receive(&self) {
        self.rx.rearm();
    }
}
