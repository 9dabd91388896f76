//! Serial Port Character Transport

use crate::transport::{CharTransport, RxArm, RxByteCallback};
use crate::UartError;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_serial::SerialPort;
use tracing::{error, info};

/// Read timeout used by the receive thread to poll the port
const READ_TIMEOUT_MS: u64 = 100;

/// Character transport over a host serial port (e.g. a USB-UART bridge)
pub struct SerialUart {
    /// Serial device path
    device: String,
    /// Write half
    port: Mutex<Box<dyn SerialPort>>,
    /// Receive arming shared with the reader thread
    rx: Arc<RxArm>,
}

impl SerialUart {
    /// Open `device` at `baud_rate` (8N1, no flow control)
    pub fn open(device: &str, baud_rate: u32) -> Result<Self, UartError> {
        info!("Opening serial CLI port {} at {} baud", device, baud_rate);

        let port = tokio_serial::new(device, baud_rate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;

        Ok(Self {
            device: device.to_string(),
            port: Mutex::new(port),
            rx: Arc::new(RxArm::new()),
        })
    }
}

impl CharTransport for SerialUart {
    fn transmit_blocking(&self, bytes: &[u8]) -> Result<(), UartError> {
        let mut port = self.port.lock().unwrap_or_else(PoisonError::into_inner);
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn receive_one_byte_async(&self, callback: RxByteCallback) -> Result<(), UartError> {
        let mut reader = self
            .port
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_clone()?;
        self.rx.register(callback)?;

        let rx = Arc::clone(&self.rx);
        let device = self.device.clone();
        std::thread::Builder::new()
            .name("uart-rx".to_string())
            .spawn(move || {
                let mut byte = [0u8; 1];
                loop {
                    match reader.read(&mut byte) {
                        Ok(1) => {
                            rx.deliver(byte[0]);
                        }
                        Ok(_) => {}
                        Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                        Err(e) => {
                            error!("Serial read on {} failed: {}", device, e);
                            return;
                        }
                    }
                }
            })?;

        Ok(())
    }

    fn rearm_receive(&self) {
        self.rx.rearm();
    }
}
