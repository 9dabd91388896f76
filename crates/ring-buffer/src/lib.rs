//! Lock-Free Byte Ring Buffer
//!
//! Single-producer/single-consumer byte queue. The producer is an interrupt
//! (or interrupt-like driver callback) that must never block; the consumer is
//! a polling task that drains whatever has arrived.

mod buffer;

pub use buffer::{ByteRingBuffer, DEFAULT_CAPACITY};

/// Receiver of drained bytes
pub trait ByteSink {
    /// Consume one byte, in arrival order
    fn feed(&mut self, byte: u8);
}

impl<F: FnMut(u8)> ByteSink for F {
    fn feed(&mut self, byte: u8) {
        self(byte)
    }
}
