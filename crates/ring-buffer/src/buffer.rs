//! Lock-Free Byte Ring Buffer Implementation

use crate::ByteSink;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use tracing::debug;

/// Default buffer capacity (63 usable bytes)
pub const DEFAULT_CAPACITY: usize = 64;

/// Lock-free SPSC ring buffer for received characters
///
/// One slot is always left free so that `head == tail` means empty and
/// `head + 1 == tail` means full. Only the producer stores `head` and only
/// the consumer stores `tail`; each side publishes its index with release
/// ordering after touching the slot and reads the other side's with acquire.
pub struct ByteRingBuffer {
    /// Pre-allocated storage
    storage: Box<[AtomicU8]>,
    /// Number of slots (usable capacity is one less)
    capacity: usize,
    /// Next write position
    head: AtomicUsize,
    /// Next read position
    tail: AtomicUsize,
    /// Bytes rejected because the buffer was full
    dropped: AtomicUsize,
}

impl ByteRingBuffer {
    /// Create a new ring buffer with `capacity` slots (minimum 2)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        debug!("Creating byte ring buffer: {} slots, {} usable", capacity, capacity - 1);
        let storage: Vec<AtomicU8> = (0..capacity).map(|_| AtomicU8::new(0)).collect();
        Self {
            storage: storage.into_boxed_slice(),
            capacity,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Create a buffer with the default capacity (64 slots)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a byte from the producer side (drops it if full)
    ///
    /// Never blocks. Returns `false` when the byte was dropped.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % self.capacity;

        if next_head == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.storage[head].store(byte, Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Drain every available byte into `sink` from the consumer side
    ///
    /// Bytes pushed while draining are picked up too. Returns the number of
    /// bytes delivered.
    pub fn drain_into<S: ByteSink + ?Sized>(&self, sink: &mut S) -> usize {
        let mut tail = self.tail.load(Ordering::Relaxed);
        let mut delivered = 0;

        while tail != self.head.load(Ordering::Acquire) {
            let byte = self.storage[tail].load(Ordering::Relaxed);
            tail = (tail + 1) % self.capacity;
            self.tail.store(tail, Ordering::Release);

            sink.feed(byte);
            delivered += 1;
        }

        delivered
    }

    /// Get the number of bytes currently buffered
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            head - tail
        } else {
            self.capacity - tail + head
        }
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity - 1
    }

    /// Get the number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of bytes dropped on a full buffer
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for ByteRingBuffer {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
