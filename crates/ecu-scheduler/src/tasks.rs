//! Task Bodies and Spawning

use crate::SchedulerError;
use can_if::{CanFrame, CanInterface, QueueConsumer};
use ecu_cli::CliInterface;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use vehicle_model::SharedVehicle;

/// Shortest period any task may run with
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Longest period any task may run with
const MAX_PERIOD: Duration = Duration::from_secs(3600);

/// Configuration for the task set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Vehicle model and telemetry period in milliseconds (default: 100)
    pub vehicle_period_ms: u64,
    /// CLI polling period in milliseconds (default: 10)
    pub cli_poll_ms: u64,
    /// Sleep of the RX worker when it has no queue, in milliseconds (default: 1000)
    pub rx_idle_poll_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            vehicle_period_ms: 100,
            cli_poll_ms: 10,
            rx_idle_poll_ms: 1000,
        }
    }
}

impl TaskConfig {
    /// Vehicle task period
    pub fn vehicle_period(&self) -> Duration {
        Duration::from_millis(self.vehicle_period_ms).clamp(MIN_PERIOD, MAX_PERIOD)
    }

    /// CLI poll period
    pub fn cli_poll(&self) -> Duration {
        Duration::from_millis(self.cli_poll_ms).clamp(MIN_PERIOD, MAX_PERIOD)
    }

    /// Idle sleep of the RX worker
    pub fn rx_idle_poll(&self) -> Duration {
        Duration::from_millis(self.rx_idle_poll_ms).clamp(MIN_PERIOD, MAX_PERIOD)
    }
}

/// Advance the vehicle model and broadcast telemetry, once per `period`
///
/// Wake-ups are scheduled against absolute deadlines so the cadence does
/// not drift with processing time. A failed transmit is counted and skipped.
pub async fn vehicle_task(vehicle: SharedVehicle, can: Arc<CanInterface>, period: Duration) {
    let dt_s = period.as_secs_f32();
    let mut next_wake = Instant::now();
    info!("Vehicle task started, period {:?}", period);

    loop {
        let snapshot = vehicle.update(|vs| {
            vs.update(dt_s);
            *vs
        });

        match can.send_telemetry(&snapshot) {
            Ok(()) => counter!("ecu_telemetry_sent_total").increment(1),
            Err(e) => {
                counter!("ecu_telemetry_failed_total").increment(1);
                debug!("Telemetry transmit failed: {}", e);
            }
        }

        next_wake += period;
        tokio::time::sleep_until(next_wake).await;
    }
}

/// Consume received frames and hand each to the CAN interface
///
/// Without an RX queue the task stays alive but idles.
pub async fn can_rx_task(
    can: Arc<CanInterface>,
    queue: Option<QueueConsumer<CanFrame>>,
    idle_poll: Duration,
) {
    let Some(mut queue) = queue else {
        error!("CAN RX task has no queue, idling");
        can.console_print("CanRxTask: RX queue is NULL!\r\n");
        idle(idle_poll).await;
        return;
    };

    info!("CAN RX task started");
    let mut reported_drops = 0;

    loop {
        let Some(frame) = queue.dequeue_blocking().await else {
            warn!("CAN RX queue closed, idling");
            idle(idle_poll).await;
            return;
        };

        counter!("ecu_can_rx_frames_total").increment(1);
        if can.process_rx_msg(&frame) {
            counter!("ecu_can_rx_logged_total").increment(1);
        }

        let dropped = queue.dropped();
        if dropped > reported_drops {
            counter!("ecu_can_rx_dropped_total").increment((dropped - reported_drops) as u64);
            warn!("CAN RX queue overflow, {} frames dropped so far", dropped);
            reported_drops = dropped;
        }
    }
}

/// Poll the CLI for received characters every `period`
pub async fn cli_task(mut cli: CliInterface, period: Duration) {
    info!("CLI task started, poll period {:?}", period);
    let mut reported_drops = 0;

    loop {
        let processed = cli.poll();
        if processed > 0 {
            counter!("ecu_cli_rx_bytes_total").increment(processed as u64);
        }

        let dropped = cli.rx_dropped();
        if dropped > reported_drops {
            counter!("ecu_cli_rx_dropped_total").increment((dropped - reported_drops) as u64);
            warn!("CLI ring buffer overflow, {} bytes dropped so far", dropped);
            reported_drops = dropped;
        }

        tokio::time::sleep(period).await;
    }
}

async fn idle(period: Duration) {
    loop {
        tokio::time::sleep(period).await;
    }
}

/// Handles of the running task set
pub struct EcuTasks {
    /// Vehicle model and telemetry task
    pub vehicle: JoinHandle<()>,
    /// CLI polling task
    pub cli: JoinHandle<()>,
    /// CAN RX worker
    pub can_rx: JoinHandle<()>,
}

impl EcuTasks {
    /// Wait until any task stops
    ///
    /// The tasks never return on their own, so this only resolves when one
    /// of them panicked or was aborted.
    pub async fn wait(self) -> SchedulerError {
        let (task, result) = tokio::select! {
            r = self.vehicle => ("VehicleTask", r),
            r = self.cli => ("CliTask", r),
            r = self.can_rx => ("CanRxTask", r),
        };

        let reason = match result {
            Ok(()) => "returned".to_string(),
            Err(e) => e.to_string(),
        };
        error!("{} stopped: {}", task, reason);
        SchedulerError::TaskExited { task, reason }
    }

    /// Abort every task
    pub fn abort(&self) {
        self.vehicle.abort();
        self.cli.abort();
        self.can_rx.abort();
    }
}

/// Spawn the three ECU tasks on the current runtime
pub fn spawn_tasks(
    config: &TaskConfig,
    vehicle: SharedVehicle,
    can: Arc<CanInterface>,
    cli: CliInterface,
) -> EcuTasks {
    let rx_queue = can.rx_queue_handle();

    let vehicle = tokio::spawn(
        vehicle_task(vehicle, Arc::clone(&can), config.vehicle_period())
            .instrument(info_span!("VehicleTask")),
    );
    let cli = tokio::spawn(cli_task(cli, config.cli_poll()).instrument(info_span!("CliTask")));
    let can_rx = tokio::spawn(
        can_rx_task(can, rx_queue, config.rx_idle_poll()).instrument(info_span!("CanRxTask")),
    );

    info!("Spawned VehicleTask, CliTask and CanRxTask");
    EcuTasks {
        vehicle,
        cli,
        can_rx,
    }
}
