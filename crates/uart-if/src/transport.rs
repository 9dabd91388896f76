//! Character Transport Trait and Receive Arming

use crate::UartError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Receive-complete callback, invoked from interrupt-like context
///
/// Must not block. It is expected to stash the byte and call
/// [`CharTransport::rearm_receive`].
pub type RxByteCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// A UART-like character transport
pub trait CharTransport: Send + Sync {
    /// Write all bytes, blocking the calling task until done
    fn transmit_blocking(&self, bytes: &[u8]) -> Result<(), UartError>;

    /// Install the receive-complete callback and arm the first receive
    fn receive_one_byte_async(&self, callback: RxByteCallback) -> Result<(), UartError>;

    /// Arm the next single-byte receive
    fn rearm_receive(&self);
}

/// Single-shot receive arming shared by the transport implementations
///
/// A byte delivered while disarmed is an overrun and is lost, as on a UART
/// whose receive interrupt was not re-armed in time.
#[derive(Default)]
pub struct RxArm {
    callback: OnceLock<RxByteCallback>,
    armed: AtomicBool,
    overruns: AtomicUsize,
}

impl RxArm {
    /// Create a disarmed slot with no callback
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback and arm
    pub fn register(&self, callback: RxByteCallback) -> Result<(), UartError> {
        self.callback
            .set(callback)
            .map_err(|_| UartError::RxAlreadyRegistered)?;
        self.armed.store(true, Ordering::Release);
        Ok(())
    }

    /// Arm the next receive (no-op until a callback is registered)
    pub fn rearm(&self) {
        if self.callback.get().is_some() {
            self.armed.store(true, Ordering::Release);
        }
    }

    /// Hand a received byte to the callback if armed
    ///
    /// Returns `false` on overrun.
    pub fn deliver(&self, byte: u8) -> bool {
        if !self.armed.swap(false, Ordering::AcqRel) {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        match self.callback.get() {
            Some(callback) => {
                callback(byte);
                true
            }
            None => false,
        }
    }

    /// Check whether a receive is armed
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Get the number of bytes lost while disarmed
    pub fn overruns(&self) -> usize {
        self.overruns.load(Ordering::Relaxed)
    }
}
