//! End-to-end scenarios: a booted ECU driven through its console

use can_if::{CanConfig, CanFrame, IdFilter, LoopbackBus};
use mini_ecu::{run, run_with, Ecu, EcuConfig, EcuError};
use std::sync::Arc;
use std::time::Duration;
use uart_if::MockUart;

struct Node {
    console: Arc<MockUart>,
    bus: Arc<LoopbackBus>,
    ecu: Ecu,
}

fn boot(config: EcuConfig) -> Node {
    let console = Arc::new(MockUart::new());
    let bus = Arc::new(LoopbackBus::new(config.can.filter));
    let ecu = Ecu::bring_up(&config, console.clone(), bus.clone()).unwrap();
    Node { console, bus, ecu }
}

/// Only frames from other nodes reach the RX queue
fn foreign_frames_only() -> EcuConfig {
    EcuConfig {
        can: CanConfig {
            filter: IdFilter::exact(0x200),
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn type_line(console: &MockUart, line: &str) -> String {
    console.take_output();
    console.inject(line.as_bytes());
    tokio::time::sleep(Duration::from_millis(20)).await;
    console.take_output()
}

#[tokio::test(start_paused = true)]
async fn test_set_speed_then_read_back() {
    let node = boot(EcuConfig::default());
    let tasks = node.ecu.start();

    let out = type_line(&node.console, "veh speed 80\r").await;
    assert!(out.contains("OK: speed updated"));

    let out = type_line(&node.console, "veh status\r").await;
    assert!(out.contains("Speed   : 80.0 km/h"), "got {:?}", out);

    tasks.abort();
}

#[tokio::test(start_paused = true)]
async fn test_rx_logging_follows_toggle() {
    let node = boot(foreign_frames_only());
    let tasks = node.ecu.start();
    let frame = CanFrame::new(0x200, &[0x11, 0x22]).unwrap();

    assert!(type_line(&node.console, "log on\r").await.contains("CAN logging ENABLED"));
    node.bus.inject(frame);
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(
        node.console.take_output(),
        "\r\n[CAN RX] ID=0x200 DLC=2 DATA=11 22\r\n"
    );

    assert!(type_line(&node.console, "log off\r").await.contains("CAN logging DISABLED"));
    node.bus.inject(frame);
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(node.console.take_output(), "");

    tasks.abort();
}

#[tokio::test(start_paused = true)]
async fn test_own_telemetry_is_logged_decoded() {
    let node = boot(EcuConfig::default());
    let tasks = node.ecu.start();

    type_line(&node.console, "veh speed 60\r").await;
    type_line(&node.console, "log on\r").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let out = node.console.take_output();
    assert!(out.contains("[CAN RX] ID=0x100 DLC=6"));
    assert!(out.contains("(speed=59.9 km/h"), "got {:?}", out);

    tasks.abort();
}

#[tokio::test(start_paused = true)]
async fn test_telemetry_uses_configured_id() {
    let mut config = EcuConfig::default();
    config.can.telemetry_id = 0x321;
    let node = boot(config);
    let tasks = node.ecu.start();

    tokio::time::sleep(Duration::from_millis(250)).await;
    tasks.abort();

    assert_eq!(node.bus.transmitted(), 3);
    assert_eq!(node.bus.last_transmitted().unwrap().id(), 0x321);
}

#[tokio::test(start_paused = true)]
async fn test_cool_hot_visible_in_status() {
    let node = boot(EcuConfig::default());
    let tasks = node.ecu.start();

    type_line(&node.console, "veh cool-hot\r").await;
    let out = type_line(&node.console, "status\r").await;
    assert!(out.contains("Coolant: 115.0 C"), "got {:?}", out);

    tasks.abort();
}

#[tokio::test(start_paused = true)]
async fn test_runs_without_rx_queue() {
    let mut config = EcuConfig::default();
    config.can.rx_queue_capacity = 0;
    let node = boot(config);
    let tasks = node.ecu.start();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(node.console.output().contains("CanRxTask: RX queue is NULL!"));

    // Telemetry and the command line keep working
    assert!(node.bus.transmitted() >= 30);
    assert!(type_line(&node.console, "help\r").await.contains("Commands:"));

    tasks.abort();
}

#[tokio::test(start_paused = true)]
async fn test_console_burst_overflows_ring() {
    let node = boot(EcuConfig::default());
    let tasks = node.ecu.start();

    // Let the CLI task drain the boot state first
    tokio::time::sleep(Duration::from_millis(15)).await;
    node.console.take_output();

    // 100 bytes land before the next poll; 63 fit
    node.console.inject(&[b'x'; 100]);
    tokio::time::sleep(Duration::from_millis(20)).await;
    node.console.take_output();

    // The truncated junk line is rejected, then the CLI recovers
    let out = type_line(&node.console, "\r").await;
    assert!(out.contains("Unknown command."));
    assert!(type_line(&node.console, "status\r").await.contains("RPM:"));

    tasks.abort();
}

#[tokio::test]
async fn test_fatal_can_init_returns_when_not_halting() {
    let config = EcuConfig {
        halt_on_fatal: false,
        ..Default::default()
    };
    let console = Arc::new(MockUart::new());
    let bus = Arc::new(LoopbackBus::default());
    bus.fail_init(true);

    let result = run_with(&config, console.clone(), bus).await;
    assert!(matches!(result, Err(EcuError::Can(_))));
    assert!(console.output().contains("CAN_IF_Init FAILED, halting"));
}

#[tokio::test(start_paused = true)]
async fn test_fatal_can_init_halts() {
    let console = Arc::new(MockUart::new());
    let bus = Arc::new(LoopbackBus::default());
    bus.fail_init(true);

    let config = EcuConfig::default();
    let halted = tokio::time::timeout(
        Duration::from_secs(60),
        run_with(&config, console.clone(), bus),
    )
    .await;
    assert!(halted.is_err());
}

#[tokio::test]
async fn test_missing_serial_device_returns_when_not_halting() {
    let mut config = EcuConfig {
        halt_on_fatal: false,
        ..Default::default()
    };
    config.uart.device = "/nonexistent/tty".into();

    let result = run(config).await;
    assert!(matches!(result, Err(EcuError::Uart(_))), "got {:?}", result);
}
