//! Layered Configuration
//!
//! Defaults, then an optional TOML file, then `MINI_ECU__*` environment
//! variables (`MINI_ECU__CAN__TELEMETRY_ID=291`, `MINI_ECU__UART__DEVICE=/dev/ttyUSB0`).

use crate::EcuError;
use can_if::CanConfig;
use config::{Config, Environment, File};
use ecu_cli::CliConfig;
use ecu_scheduler::TaskConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;
use uart_if::UartConfig;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mini-ecu.toml";

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "MINI_ECU_CONFIG";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "MINI_ECU";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete ECU configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcuConfig {
    /// Task periods
    pub tasks: TaskConfig,
    /// CAN interface
    pub can: CanConfig,
    /// Console transport
    pub uart: UartConfig,
    /// Command line buffers
    pub cli: CliConfig,
    /// Logging
    pub log: LogConfig,
    /// Halt forever on a fatal error instead of exiting
    pub halt_on_fatal: bool,
    /// Prometheus scrape address; no exporter when unset
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for EcuConfig {
    fn default() -> Self {
        Self {
            tasks: TaskConfig::default(),
            can: CanConfig::default(),
            uart: UartConfig::default(),
            cli: CliConfig::default(),
            log: LogConfig::default(),
            halt_on_fatal: true,
            metrics_addr: None,
        }
    }
}

impl EcuConfig {
    /// Load the layered configuration
    ///
    /// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_FILE`]
    /// is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, EcuError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: EcuConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

/// Pick the config file from `--config <path>`, `--config=<path>`, or the
/// [`CONFIG_ENV`] value, in that order
pub fn config_path<I>(args: I, env_value: Option<OsString>) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return Some(PathBuf::from(path));
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    env_value.map(PathBuf::from)
}
