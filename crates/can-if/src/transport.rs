//! CAN Transport Seam

use crate::{CanError, CanFrame};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Receive callback, invoked from interrupt context with each accepted frame
///
/// Must not block.
pub type RxFrameCallback = Arc<dyn Fn(CanFrame) + Send + Sync>;

/// Low-level CAN peripheral driver
pub trait CanTransport: Send + Sync {
    /// Configure and start the peripheral
    fn init(&self) -> Result<(), CanError>;

    /// Queue a frame for transmission
    fn transmit(&self, frame: &CanFrame) -> Result<(), CanError>;

    /// Install the receive callback and enable RX notifications
    fn enable_receive_notifications(&self, callback: RxFrameCallback) -> Result<(), CanError>;
}

/// Identifier/mask acceptance filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFilter {
    /// Identifier bits to compare
    pub id: u16,
    /// Which bits of the identifier must match
    pub mask: u16,
}

impl IdFilter {
    /// Filter accepting every frame
    pub const fn accept_all() -> Self {
        Self { id: 0, mask: 0 }
    }

    /// Filter accepting exactly one identifier
    pub const fn exact(id: u16) -> Self {
        Self { id, mask: 0x7FF }
    }

    /// Check whether a frame identifier passes the filter
    pub fn matches(&self, id: u16) -> bool {
        (id & self.mask) == (self.id & self.mask)
    }
}

impl Default for IdFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        let filter = IdFilter::accept_all();
        assert!(filter.matches(0x000));
        assert!(filter.matches(0x7FF));
    }

    #[test]
    fn test_exact_and_masked() {
        assert!(IdFilter::exact(0x123).matches(0x123));
        assert!(!IdFilter::exact(0x123).matches(0x124));

        let block = IdFilter { id: 0x100, mask: 0x700 };
        assert!(block.matches(0x1AB));
        assert!(!block.matches(0x2AB));
    }
}
