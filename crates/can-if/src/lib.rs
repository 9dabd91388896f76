//! CAN Interface Layer
//!
//! Wraps the CAN transport behind a small API: telemetry encoding, the RX
//! queue that hands frames from the receive interrupt to a worker task, and
//! optional logging of received frames to the CLI console.

mod error;
mod frame;
mod interface;
mod loopback;
pub mod queue;
mod telemetry;
mod transport;

pub use error::CanError;
pub use frame::CanFrame;
pub use interface::{CanInterface, LoggingFlag};
pub use loopback::LoopbackBus;
pub use queue::{QueueConsumer, QueueProducer};
pub use telemetry::TelemetryCodec;
pub use transport::{CanTransport, IdFilter, RxFrameCallback};

use serde::{Deserialize, Serialize};

/// Largest standard (11-bit) CAN identifier
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Default telemetry frame identifier
pub const DEFAULT_TELEMETRY_ID: u16 = 0x100;

/// Default RX queue depth
pub const DEFAULT_RX_QUEUE_CAPACITY: usize = 8;

/// CAN interface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanConfig {
    /// Identifier used for outgoing telemetry frames
    pub telemetry_id: u16,
    /// RX queue depth (0 disables the queue)
    pub rx_queue_capacity: usize,
    /// Acceptance filter for received frames
    pub filter: IdFilter,
    /// Log received frames from startup
    pub logging: bool,
}

impl Default for CanConfig {
    fn default() -> Self {
        Self {
            telemetry_id: DEFAULT_TELEMETRY_ID,
            rx_queue_capacity: DEFAULT_RX_QUEUE_CAPACITY,
            filter: IdFilter::accept_all(),
            logging: false,
        }
    }
}
