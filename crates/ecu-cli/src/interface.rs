//! CLI Interface: receive hook, line editing, dispatch

use crate::command::{Command, OVERHEAT_TEMP_C};
use crate::line::{LineBuffer, LineEvent};
use crate::CliConfig;
use can_if::LoggingFlag;
use ring_buffer::ByteRingBuffer;
use std::sync::Arc;
use tracing::{debug, info};
use uart_if::{CharTransport, UartError};
use vehicle_model::{SharedVehicle, VehicleState};

const PROMPT: &str = "\r\n> ";
const GREETING: &str = "\r\nCLI ready. Type 'help' and press Enter.\r\n> ";
const HELP: &str = "\r\nCommands:\r\n\
                    \x20 help          - show this help\r\n\
                    \x20 status        - show basic vehicle state\r\n\
                    \x20 veh status    - show detailed vehicle state\r\n\
                    \x20 veh speed X   - set target speed to X km/h\r\n\
                    \x20 veh cool-hot  - inject coolant overheat\r\n\
                    \x20 log on        - enable CAN RX logging\r\n\
                    \x20 log off       - disable CAN RX logging\r\n> ";

/// State the command handlers act on
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Process-wide vehicle, used by the `veh ...` commands
    pub vehicle: SharedVehicle,
    /// Vehicle reported by `status`; `None` leaves the CLI unbound
    pub bound: Option<SharedVehicle>,
    /// CAN RX logging switch
    pub logging: LoggingFlag,
}

impl CliContext {
    /// Bind `status` to the process-wide vehicle
    pub fn new(vehicle: SharedVehicle, logging: LoggingFlag) -> Self {
        Self {
            bound: Some(vehicle.clone()),
            vehicle,
            logging,
        }
    }
}

/// Line-based command interface over a character transport
pub struct CliInterface {
    /// Console transport
    console: Arc<dyn CharTransport>,
    /// Bytes handed over by the receive callback
    rx_ring: Arc<ByteRingBuffer>,
    /// Line being typed
    line: LineBuffer,
    /// Command targets
    ctx: CliContext,
}

impl CliInterface {
    /// Arm interrupt-driven receive and print the greeting
    ///
    /// The receive callback only pushes into the ring buffer and re-arms;
    /// all parsing happens later in [`CliInterface::poll`].
    pub fn init(
        console: Arc<dyn CharTransport>,
        ctx: CliContext,
        config: &CliConfig,
    ) -> Result<Self, UartError> {
        let rx_ring = Arc::new(ByteRingBuffer::new(config.ring_capacity));

        let ring = Arc::clone(&rx_ring);
        let uart = Arc::clone(&console);
        console.receive_one_byte_async(Arc::new(move |byte| {
            ring.push(byte);
            uart.rearm_receive();
        }))?;

        let cli = Self {
            console,
            rx_ring,
            line: LineBuffer::new(config.line_capacity),
            ctx,
        };
        cli.print(GREETING);
        info!("CLI ready (ring {} slots, line {} bytes)", config.ring_capacity, config.line_capacity);

        Ok(cli)
    }

    /// Drain received bytes into the line editor
    ///
    /// Non-blocking. Returns the number of bytes processed.
    pub fn poll(&mut self) -> usize {
        let ring = Arc::clone(&self.rx_ring);
        ring.drain_into(&mut |byte: u8| self.handle_char(byte))
    }

    /// Feed one character to the line editor
    pub fn handle_char(&mut self, byte: u8) {
        match self.line.push(byte) {
            LineEvent::Accepted(c) => self.write(&[c]),
            LineEvent::Discarded => {}
            LineEvent::Empty => self.print(PROMPT),
            LineEvent::Line(line) => self.dispatch(&line),
        }
    }

    /// Get the number of received bytes lost to a full ring buffer
    pub fn rx_dropped(&self) -> usize {
        self.rx_ring.dropped()
    }

    fn dispatch(&mut self, line: &str) {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                debug!("CLI rejected {:?}: {}", line, e);
                self.print(&format!("\r\n{}\r\n> ", e));
                return;
            }
        };

        debug!("CLI command: {:?}", command);
        let response = match command {
            Command::Help => HELP.to_string(),
            Command::Status => match &self.ctx.bound {
                Some(vehicle) => format_status(&vehicle.snapshot()),
                None => "\r\n[ERR] No vehicle bound to CLI\r\n> ".to_string(),
            },
            Command::VehStatus => format_vehicle(&self.ctx.vehicle.snapshot()),
            Command::VehSpeed(v) => {
                self.ctx.vehicle.update(|vs| vs.set_target_speed(v));
                "\r\nOK: speed updated\r\n> ".to_string()
            }
            Command::VehCoolHot => {
                self.ctx
                    .vehicle
                    .update(|vs| vs.force(vs.speed_kph, vs.engine_rpm, OVERHEAT_TEMP_C));
                "\r\nInjected: coolant overheat\r\n> ".to_string()
            }
            Command::LogOn => {
                self.ctx.logging.set(true);
                info!("CAN RX logging enabled from CLI");
                "\r\nCAN logging ENABLED\r\n> ".to_string()
            }
            Command::LogOff => {
                self.ctx.logging.set(false);
                info!("CAN RX logging disabled from CLI");
                "\r\nCAN logging DISABLED\r\n> ".to_string()
            }
        };
        self.print(&response);
    }

    fn print(&self, s: &str) {
        self.write(s.as_bytes());
    }

    fn write(&self, bytes: &[u8]) {
        if let Err(e) = self.console.transmit_blocking(bytes) {
            debug!("CLI transmit failed: {}", e);
        }
    }
}

fn format_status(vs: &VehicleState) -> String {
    format!(
        "\r\nSpeed:   {:.1} km/h\r\nRPM:     {}\r\nCoolant: {:.1} C\r\n> ",
        vs.speed_kph, vs.engine_rpm, vs.coolant_temp_c
    )
}

fn format_vehicle(vs: &VehicleState) -> String {
    format!(
        "\r\nVehicle:\r\n  Speed   : {:.1} km/h\r\n  RPM     : {}\r\n  Coolant : {:.1} C\r\n> ",
        vs.speed_kph, vs.engine_rpm, vs.coolant_temp_c
    )
}
