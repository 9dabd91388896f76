//! Scheduler Error Types

use thiserror::Error;

/// Errors reported by the task supervisor
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A task that should run forever stopped
    #[error("{task} exited: {reason}")]
    TaskExited { task: &'static str, reason: String },
}
