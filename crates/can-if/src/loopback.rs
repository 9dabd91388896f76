//! Loopback CAN Bus
//!
//! Host stand-in for a CAN controller in loopback (self-test) mode: every
//! transmitted frame that passes the acceptance filter is delivered straight
//! back to the receive callback, on the transmitting thread, just as the RX
//! interrupt would fire on the real controller.

use crate::transport::{CanTransport, IdFilter, RxFrameCallback};
use crate::{CanError, CanFrame};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, info, warn};

/// In-memory loopback CAN controller
pub struct LoopbackBus {
    /// Acceptance filter
    filter: IdFilter,
    /// Whether the controller is started
    started: AtomicBool,
    /// Receive callback, once notifications are enabled
    rx_callback: OnceLock<RxFrameCallback>,
    /// Frames accepted for transmission
    tx_count: AtomicUsize,
    /// Most recent transmitted frame
    last_tx: Mutex<Option<CanFrame>>,
    /// Fault injection: refuse to start
    fail_init: AtomicBool,
    /// Fault injection: reject transmits
    bus_off: AtomicBool,
}

impl LoopbackBus {
    /// Create a stopped loopback controller
    pub fn new(filter: IdFilter) -> Self {
        Self {
            filter,
            started: AtomicBool::new(false),
            rx_callback: OnceLock::new(),
            tx_count: AtomicUsize::new(0),
            last_tx: Mutex::new(None),
            fail_init: AtomicBool::new(false),
            bus_off: AtomicBool::new(false),
        }
    }

    /// Make the next `init` fail
    pub fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::Relaxed);
    }

    /// Put the controller in or out of bus-off
    pub fn set_bus_off(&self, bus_off: bool) {
        if bus_off {
            warn!("Loopback bus: entering bus-off");
        }
        self.bus_off.store(bus_off, Ordering::Relaxed);
    }

    /// Deliver a frame as if another node had sent it
    ///
    /// Returns `true` if it reached the receive callback.
    pub fn inject(&self, frame: CanFrame) -> bool {
        if !self.started.load(Ordering::Acquire) {
            return false;
        }
        self.deliver(frame)
    }

    /// Get the number of frames transmitted
    pub fn transmitted(&self) -> usize {
        self.tx_count.load(Ordering::Relaxed)
    }

    /// Get the most recent transmitted frame
    pub fn last_transmitted(&self) -> Option<CanFrame> {
        *self.last_tx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, frame: CanFrame) -> bool {
        if !self.filter.matches(frame.id()) {
            return false;
        }
        match self.rx_callback.get() {
            Some(callback) => {
                callback(frame);
                true
            }
            None => false,
        }
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new(IdFilter::accept_all())
    }
}

impl CanTransport for LoopbackBus {
    fn init(&self) -> Result<(), CanError> {
        if self.fail_init.load(Ordering::Relaxed) {
            return Err(CanError::InitFailed("loopback controller refused to start".to_string()));
        }
        self.started.store(true, Ordering::Release);
        info!("Loopback CAN started (filter id=0x{:03X} mask=0x{:03X})", self.filter.id, self.filter.mask);
        Ok(())
    }

    fn transmit(&self, frame: &CanFrame) -> Result<(), CanError> {
        if !self.started.load(Ordering::Acquire) {
            return Err(CanError::NotInitialized);
        }
        if self.bus_off.load(Ordering::Relaxed) {
            return Err(CanError::BusOff);
        }

        self.tx_count.fetch_add(1, Ordering::Relaxed);
        *self.last_tx.lock().unwrap_or_else(PoisonError::into_inner) = Some(*frame);
        self.deliver(*frame);
        Ok(())
    }

    fn enable_receive_notifications(&self, callback: RxFrameCallback) -> Result<(), CanError> {
        if !self.started.load(Ordering::Acquire) {
            return Err(CanError::NotInitialized);
        }
        self.rx_callback
            .set(callback)
            .map_err(|_| CanError::AlreadyEnabled)?;
        debug!("Loopback CAN RX notifications enabled");
        Ok(())
    }
}
