//! Mini ECU Command Line
//!
//! Interrupt-driven receive into a byte ring buffer, drained at task level
//! into a line editor whose completed lines are dispatched to a small fixed
//! command table.
//!
//! | Command          | Effect                               |
//! |------------------|--------------------------------------|
//! | `help`, `h`      | show the command summary             |
//! | `status`         | show the bound vehicle               |
//! | `veh status`     | show the process-wide vehicle        |
//! | `veh speed <x>`  | set target speed to `x` km/h         |
//! | `veh cool-hot`   | inject a coolant overheat (115 °C)   |
//! | `log on`/`off`   | enable/disable CAN RX logging        |

mod command;
mod interface;
mod line;

pub use command::{Command, CommandError};
pub use interface::{CliContext, CliInterface};
pub use line::{LineBuffer, LineEvent};

use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Receive ring buffer slots
    pub ring_capacity: usize,
    /// Line buffer size (one byte is reserved, as for a terminator)
    pub line_capacity: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ring_capacity: ring_buffer::DEFAULT_CAPACITY,
            line_capacity: line::DEFAULT_LINE_CAPACITY,
        }
    }
}
