//! CAN Application Interface

use crate::queue::{self, QueueConsumer};
use crate::telemetry::TelemetryCodec;
use crate::transport::CanTransport;
use crate::{CanConfig, CanError, CanFrame};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use uart_if::CharTransport;
use vehicle_model::VehicleState;

/// Process-wide "log received frames" switch
///
/// Written by CLI commands, read by the RX worker. A toggle may take effect
/// one frame late.
#[derive(Debug, Clone, Default)]
pub struct LoggingFlag(Arc<AtomicBool>);

impl LoggingFlag {
    /// Create a flag with an initial value
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Enable or disable logging
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    /// Check whether logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// CAN interface: telemetry transmit, RX queue ownership, RX logging
pub struct CanInterface {
    /// Peripheral driver
    transport: Arc<dyn CanTransport>,
    /// Console that receives RX log lines
    console: Arc<dyn CharTransport>,
    /// Telemetry frame encoder
    codec: TelemetryCodec,
    /// RX logging switch
    logging: LoggingFlag,
    /// Consumer end of the RX queue until a worker claims it
    rx_queue: Mutex<Option<QueueConsumer<CanFrame>>>,
}

impl CanInterface {
    /// Start the peripheral, create the RX queue and enable RX notifications
    ///
    /// A queue that cannot be created is not fatal: the interface comes up
    /// without one and [`CanInterface::rx_queue_handle`] returns `None`.
    pub fn init(
        transport: Arc<dyn CanTransport>,
        console: Arc<dyn CharTransport>,
        config: &CanConfig,
    ) -> Result<Self, CanError> {
        let codec = TelemetryCodec::new(config.telemetry_id)?;
        transport.init()?;

        let rx_queue = match queue::bounded::<CanFrame>(config.rx_queue_capacity) {
            Some((producer, consumer)) => {
                transport.enable_receive_notifications(Arc::new(move |frame| {
                    producer.try_enqueue(frame);
                }))?;
                Some(consumer)
            }
            None => {
                warn!(
                    "CAN RX queue not created (capacity {}), received frames are ignored",
                    config.rx_queue_capacity
                );
                None
            }
        };

        info!(
            "CAN interface up: telemetry ID 0x{:03X}, RX queue depth {}",
            codec.id(),
            config.rx_queue_capacity
        );

        Ok(Self {
            transport,
            console,
            codec,
            logging: LoggingFlag::new(config.logging),
            rx_queue: Mutex::new(rx_queue),
        })
    }

    /// Encode and transmit one telemetry frame
    pub fn send_telemetry(&self, state: &VehicleState) -> Result<(), CanError> {
        let frame = self.codec.encode(state);
        self.transport.transmit(&frame)
    }

    /// Enable or disable RX logging
    pub fn set_logging(&self, enable: bool) {
        self.logging.set(enable);
        info!("CAN RX logging {}", if enable { "enabled" } else { "disabled" });
    }

    /// Get a handle to the RX logging switch
    pub fn logging_flag(&self) -> LoggingFlag {
        self.logging.clone()
    }

    /// Get the telemetry codec
    pub fn codec(&self) -> TelemetryCodec {
        self.codec
    }

    /// Claim the consumer end of the RX queue
    ///
    /// `None` if the queue was never created or has already been claimed.
    pub fn rx_queue_handle(&self) -> Option<QueueConsumer<CanFrame>> {
        self.rx_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Handle one received frame at task level
    ///
    /// Writes a log line to the console when logging is enabled and returns
    /// whether it did.
    pub fn process_rx_msg(&self, msg: &CanFrame) -> bool {
        if !self.logging.is_enabled() {
            return false;
        }

        self.console_print(&self.format_rx_line(msg));
        true
    }

    /// Write a diagnostic message to the console
    pub fn console_print(&self, s: &str) {
        if let Err(e) = self.console.transmit_blocking(s.as_bytes()) {
            debug!("CAN console write failed: {}", e);
        }
    }

    fn format_rx_line(&self, msg: &CanFrame) -> String {
        let mut line = format!("\r\n[CAN RX] {}", msg);
        if let Ok(state) = self.codec.decode(msg) {
            line.push_str(&format!(
                " (speed={:.1} km/h rpm={} coolant={:.1} C)",
                state.speed_kph, state.engine_rpm, state.coolant_temp_c
            ));
        }
        line.push_str("\r\n");
        line
    }
}
