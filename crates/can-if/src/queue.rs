//! Bounded ISR-to-Task Message Queue
//!
//! The producer side never blocks and never allocates: a full queue drops
//! the newest item. The consumer side suspends its task until an item is
//! available. Items come out in the order they went in.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Largest capacity the underlying channel supports
pub const MAX_CAPACITY: usize = usize::MAX >> 3;

/// Create a queue holding at most `capacity` items
///
/// Returns `None` when the queue cannot be created (zero capacity or above
/// [`MAX_CAPACITY`]).
pub fn bounded<T>(capacity: usize) -> Option<(QueueProducer<T>, QueueConsumer<T>)> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return None;
    }

    debug!("Creating message queue with capacity {}", capacity);
    let (tx, rx) = mpsc::channel(capacity);
    let dropped = Arc::new(AtomicUsize::new(0));

    Some((
        QueueProducer {
            tx,
            dropped: Arc::clone(&dropped),
        },
        QueueConsumer { rx, dropped },
    ))
}

/// Interrupt-side handle
pub struct QueueProducer<T> {
    tx: mpsc::Sender<T>,
    dropped: Arc<AtomicUsize>,
}

impl<T> QueueProducer<T> {
    /// Enqueue without blocking; returns `false` if the item was dropped
    pub fn try_enqueue(&self, item: T) -> bool {
        match self.tx.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

/// Task-side handle (exactly one exists per queue)
pub struct QueueConsumer<T> {
    rx: mpsc::Receiver<T>,
    dropped: Arc<AtomicUsize>,
}

impl<T> QueueConsumer<T> {
    /// Wait, without a deadline, for the next item
    ///
    /// Returns `None` only once every producer is gone and the queue is
    /// drained.
    pub async fn dequeue_blocking(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Wait at most `timeout` for the next item
    pub async fn dequeue_timeout(&mut self, timeout: Duration) -> Option<T> {
        tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Take the next item if one is already queued
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Get the number of items dropped by the producer so far
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
