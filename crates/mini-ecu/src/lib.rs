//! Mini ECU Application
//!
//! Host build of a small CAN telemetry node: a vehicle model broadcast over
//! CAN every 100 ms, a worker that logs received frames, and a UART command
//! line for inspecting and perturbing the model.

mod app;
mod error;
mod observability;
mod settings;

pub use app::{run, run_with, Ecu, BANNER};
pub use error::EcuError;
pub use observability::{init_logging, install_metrics_exporter};
pub use settings::{
    config_path, EcuConfig, LogConfig, CONFIG_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX,
};
