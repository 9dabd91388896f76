//! Mini ECU Task Scheduler
//!
//! Three never-ending tasks coordinated only through the CAN RX queue and
//! the CLI ring buffer:
//!
//! - `VehicleTask`: updates the model every period and broadcasts telemetry
//! - `CanRxTask`: waits on the RX queue and logs frames when enabled
//! - `CliTask`: polls the CLI ring buffer on a short fixed period

mod error;
mod tasks;

pub use error::SchedulerError;
pub use tasks::{can_rx_task, cli_task, spawn_tasks, vehicle_task, EcuTasks, TaskConfig};
