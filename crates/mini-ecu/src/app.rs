//! ECU Bring-up and Run Loop

use crate::{install_metrics_exporter, EcuConfig, EcuError};
use can_if::{CanInterface, CanTransport, LoopbackBus};
use ecu_cli::{CliContext, CliInterface};
use ecu_scheduler::{spawn_tasks, EcuTasks, TaskConfig};
use std::sync::Arc;
use tracing::{debug, error, info};
use uart_if::CharTransport;
use vehicle_model::{SharedVehicle, VehicleState};

/// Startup banner
pub const BANNER: &str = "\r\n=== Mini ECU – CAN + RTOS Telemetry Node ===\r\n";

const CAN_INIT_FAILED: &str = "CAN_IF_Init FAILED, halting\r\n";
const CLI_INIT_FAILED: &str = "CLI_IF_Init FAILED, halting\r\n";
const INIT_COMPLETE: &str = "Init complete, creating RTOS tasks...\r\n";
const TASKS_STOPPED: &str = "ERROR: task scheduler returned!\r\n";

/// An initialized ECU whose tasks have not started yet
pub struct Ecu {
    tasks: TaskConfig,
    vehicle: SharedVehicle,
    can: Arc<CanInterface>,
    cli: CliInterface,
}

impl Ecu {
    /// Bring up the vehicle model, the CAN interface and the CLI, in that order
    pub fn bring_up(
        config: &EcuConfig,
        console: Arc<dyn CharTransport>,
        bus: Arc<dyn CanTransport>,
    ) -> Result<Self, EcuError> {
        print(console.as_ref(), BANNER);

        let vehicle = SharedVehicle::new(VehicleState::new());

        let can = match CanInterface::init(bus, Arc::clone(&console), &config.can) {
            Ok(can) => Arc::new(can),
            Err(e) => {
                print(console.as_ref(), CAN_INIT_FAILED);
                error!("CAN interface init failed: {}", e);
                return Err(e.into());
            }
        };

        let ctx = CliContext::new(vehicle.clone(), can.logging_flag());
        let cli = match CliInterface::init(Arc::clone(&console), ctx, &config.cli) {
            Ok(cli) => cli,
            Err(e) => {
                print(console.as_ref(), CLI_INIT_FAILED);
                error!("CLI init failed: {}", e);
                return Err(e.into());
            }
        };

        print(console.as_ref(), INIT_COMPLETE);
        info!("Mini ECU initialized");

        Ok(Self {
            tasks: config.tasks.clone(),
            vehicle,
            can,
            cli,
        })
    }

    /// Get a handle to the process-wide vehicle
    pub fn vehicle(&self) -> SharedVehicle {
        self.vehicle.clone()
    }

    /// Spawn the ECU tasks
    pub fn start(self) -> EcuTasks {
        spawn_tasks(&self.tasks, self.vehicle, self.can, self.cli)
    }
}

/// Run the ECU on the configured console and a host loopback CAN bus
pub async fn run(config: EcuConfig) -> Result<(), EcuError> {
    if let Some(addr) = config.metrics_addr {
        install_metrics_exporter(addr)?;
    }

    let console = match uart_if::open_transport(&config.uart) {
        Ok(console) => console,
        Err(e) => return fatal(&config, e.into()).await,
    };
    let bus = Arc::new(LoopbackBus::new(config.can.filter));

    run_with(&config, console, bus).await
}

/// Run the ECU on the given transports
///
/// Only returns on a fatal error, and only when `halt_on_fatal` is off.
pub async fn run_with(
    config: &EcuConfig,
    console: Arc<dyn CharTransport>,
    bus: Arc<dyn CanTransport>,
) -> Result<(), EcuError> {
    let ecu = match Ecu::bring_up(config, Arc::clone(&console), bus) {
        Ok(ecu) => ecu,
        Err(e) => return fatal(config, e).await,
    };

    let err = ecu.start().wait().await;
    print(console.as_ref(), TASKS_STOPPED);
    fatal(config, err.into()).await
}

async fn fatal(config: &EcuConfig, err: EcuError) -> Result<(), EcuError> {
    if config.halt_on_fatal {
        error!("Fatal error, halting: {}", err);
        std::future::pending::<()>().await;
    }
    Err(err)
}

fn print(console: &dyn CharTransport, s: &str) {
    if let Err(e) = console.transmit_blocking(s.as_bytes()) {
        debug!("Console write failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uart_if::{MockUart, UartError};

    #[test]
    fn test_bring_up_transcript() {
        let console = Arc::new(MockUart::new());
        let ecu = Ecu::bring_up(
            &EcuConfig::default(),
            console.clone(),
            Arc::new(LoopbackBus::default()),
        )
        .unwrap();

        let out = console.output();
        let banner = out.find("=== Mini ECU").unwrap();
        let greeting = out.find("CLI ready.").unwrap();
        let complete = out.find("Init complete").unwrap();
        assert!(banner < greeting && greeting < complete);
        assert_eq!(ecu.vehicle().snapshot(), VehicleState::new());
    }

    #[test]
    fn test_can_failure_stops_before_cli() {
        let console = Arc::new(MockUart::new());
        let bus = Arc::new(LoopbackBus::default());
        bus.fail_init(true);

        let result = Ecu::bring_up(&EcuConfig::default(), console.clone(), bus);
        assert!(matches!(result, Err(EcuError::Can(_))));

        let out = console.output();
        assert!(out.contains("CAN_IF_Init FAILED, halting"));
        assert!(!out.contains("CLI ready."));
        assert!(!console.is_armed());
    }

    #[test]
    fn test_cli_failure_reported_on_console() {
        let console = Arc::new(MockUart::new());
        // A receive callback already installed makes CLI arming fail
        console
            .receive_one_byte_async(Arc::new(|_: u8| {}))
            .unwrap();

        let result = Ecu::bring_up(
            &EcuConfig::default(),
            console.clone(),
            Arc::new(LoopbackBus::default()),
        );
        assert!(matches!(
            result,
            Err(EcuError::Uart(UartError::RxAlreadyRegistered))
        ));

        let out = console.output();
        assert!(out.contains("CLI_IF_Init FAILED, halting"));
        assert!(!out.contains("CLI ready."));
        assert!(!out.contains("Init complete"));
    }
}
