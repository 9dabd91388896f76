//! Command Table

use thiserror::Error;

/// Coolant temperature injected by `veh cool-hot` (°C)
pub const OVERHEAT_TEMP_C: f32 = 115.0;

const VEH_SPEED_PREFIX: &str = "veh speed ";

/// A recognised CLI command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `help` / `h`
    Help,
    /// `status`
    Status,
    /// `veh status`
    VehStatus,
    /// `veh speed <km/h>`
    VehSpeed(f32),
    /// `veh cool-hot`
    VehCoolHot,
    /// `log on`
    LogOn,
    /// `log off`
    LogOff,
}

/// Why a line did not yield a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Line matches no entry of the command table
    #[error("Unknown command. Try 'help'.")]
    Unknown(String),

    /// `veh speed` argument is not a finite number
    #[error("[ERR] Invalid speed '{0}'")]
    InvalidSpeed(String),
}

impl Command {
    /// Match a complete line against the command table (case-sensitive)
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        match line {
            "help" | "h" => Ok(Command::Help),
            "status" => Ok(Command::Status),
            "veh status" => Ok(Command::VehStatus),
            "veh cool-hot" => Ok(Command::VehCoolHot),
            "log on" => Ok(Command::LogOn),
            "log off" => Ok(Command::LogOff),
            _ => match line.strip_prefix(VEH_SPEED_PREFIX) {
                Some(arg) => parse_speed(arg).map(Command::VehSpeed),
                None => Err(CommandError::Unknown(line.to_string())),
            },
        }
    }
}

fn parse_speed(arg: &str) -> Result<f32, CommandError> {
    let arg = arg.trim();
    match arg.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandError::InvalidSpeed(arg.to_string())),
    }
}
