//! Application Error Types

use can_if::CanError;
use ecu_scheduler::SchedulerError;
use thiserror::Error;
use uart_if::UartError;

/// Errors that stop the ECU
#[derive(Debug, Error)]
pub enum EcuError {
    /// CAN interface failed to come up
    #[error("CAN interface error: {0}")]
    Can(#[from] CanError),

    /// Console transport failed
    #[error("UART error: {0}")]
    Uart(#[from] UartError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Unknown log level name
    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),

    /// Global subscriber already installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Metrics exporter could not be installed
    #[error("Metrics exporter failed: {0}")]
    Metrics(String),

    /// A task stopped
    #[error(transparent)]
    Task(#[from] SchedulerError),
}
