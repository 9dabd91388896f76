//! Mock UART implementation for testing

use crate::transport::{CharTransport, RxArm, RxByteCallback};
use crate::UartError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// In-memory UART
///
/// Records everything transmitted and lets tests inject received bytes,
/// which are delivered synchronously through the receive callback exactly
/// as the interrupt handler would see them.
#[derive(Default)]
pub struct MockUart {
    tx: Mutex<Vec<u8>>,
    rx: RxArm,
    fail_transmit: AtomicBool,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver bytes as if they arrived on the wire
    ///
    /// Returns the number of bytes accepted (the rest were overruns).
    pub fn inject(&self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|b| self.rx.deliver(**b)).count()
    }

    /// Get everything transmitted so far
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.lock_tx()).into_owned()
    }

    /// Get and clear everything transmitted so far
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock_tx());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Make subsequent transmits fail
    pub fn set_fail_transmit(&self, fail: bool) {
        self.fail_transmit.store(fail, Ordering::Relaxed);
    }

    /// Check whether a receive is armed
    pub fn is_armed(&self) -> bool {
        self.rx.is_armed()
    }

    /// Get the number of injected bytes lost while disarmed
    pub fn overruns(&self) -> usize {
        self.rx.overruns()
    }

    fn lock_tx(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CharTransport for MockUart {
    fn transmit_blocking(&self, bytes: &[u8]) -> Result<(), UartError> {
        if self.fail_transmit.load(Ordering::Relaxed) {
            return Err(UartError::TransmitFailed);
        }
        self.lock_tx().extend_from_slice(bytes);
        Ok(())
    }

    fn receive_one_byte_async(&self, callback: RxByteCallback) -> Result<(), UartError> {
        self.rx.register(callback)
    }

    fn rearm_receive(&self) {
        self.rx.rearm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_transmit_recorded() {
        let uart = MockUart::new();
        uart.transmit_blocking(b"Hello").unwrap();
        uart.transmit_blocking(b"\r\n> ").unwrap();

        assert_eq!(uart.output(), "Hello\r\n> ");
        assert_eq!(uart.take_output(), "Hello\r\n> ");
        assert_eq!(uart.output(), "");
    }

    #[test]
    fn test_injected_bytes_need_rearm() {
        let uart = Arc::new(MockUart::new());
        let seen = Arc::new(Mutex::new(Vec::<u8>::new()));

        let sink = Arc::clone(&seen);
        let rearm = Arc::clone(&uart);
        uart.receive_one_byte_async(Arc::new(move |b: u8| {
            sink.lock().unwrap().push(b);
            rearm.rearm_receive();
        }))
        .unwrap();

        assert_eq!(uart.inject(b"help\r"), 5);
        assert_eq!(*seen.lock().unwrap(), b"help\r");
        assert!(uart.is_armed());
    }

    #[test]
    fn test_without_rearm_bytes_overrun() {
        let uart = MockUart::new();
        uart.receive_one_byte_async(Arc::new(|_: u8| {})).unwrap();

        assert_eq!(uart.inject(b"abc"), 1);
        assert_eq!(uart.overruns(), 2);
    }

    #[test]
    fn test_transmit_failure() {
        let uart = MockUart::new();
        uart.set_fail_transmit(true);
        assert!(matches!(
            uart.transmit_blocking(b"x"),
            Err(UartError::TransmitFailed)
        ));
    }
}
