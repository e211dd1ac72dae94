#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use printdash_core::{Command, CoreError, DEFAULT_EXTRUDE_MM, Fleet, FleetConfig, HeatLevel};

use common::{MockPrinter, binding};

fn manual_config() -> FleetConfig {
    FleetConfig {
        poll_interval: Duration::ZERO,
        watch_files: false,
        ..FleetConfig::default()
    }
}

#[tokio::test]
async fn commands_reach_the_named_printer() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    let prusa = MockPrinter::new("prusa");
    let fleet = Fleet::new(
        manual_config(),
        vec![
            binding(&ender, "usb0", dir.path()),
            binding(&prusa, "usb1", dir.path()),
        ],
    )
    .unwrap();
    fleet.start().await.unwrap();

    let prusa_name = || "prusa".to_owned();
    for cmd in [
        Command::Connect {
            printer: prusa_name(),
            port: "/dev/ttyACM0".into(),
        },
        Command::Preheat {
            printer: prusa_name(),
            level: HeatLevel::High,
        },
        Command::Extrude {
            printer: prusa_name(),
            amount_mm: DEFAULT_EXTRUDE_MM,
        },
        Command::MoveZ {
            printer: prusa_name(),
            z: 10,
        },
        Command::StartJob {
            printer: prusa_name(),
        },
        Command::PrintFile {
            printer: prusa_name(),
            file_name: "benchy.gcode".into(),
        },
    ] {
        fleet.execute(cmd).await.unwrap();
    }

    assert_eq!(
        prusa.calls(),
        vec![
            "connect /dev/ttyACM0",
            "tool 220",
            "bed 60",
            "extrude 100",
            "jog z 10",
            "start",
            "print benchy.gcode",
        ]
    );
    assert!(ender.calls().is_empty());
    fleet.shutdown().await;
}

#[tokio::test]
async fn cancel_switches_heaters_off() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    let fleet = Fleet::new(manual_config(), vec![binding(&ender, "usb0", dir.path())]).unwrap();
    fleet.start().await.unwrap();

    fleet
        .execute(Command::CancelJob {
            printer: "ender3".into(),
        })
        .await
        .unwrap();

    assert_eq!(ender.calls(), vec!["cancel", "tool 0", "bed 0"]);
    fleet.shutdown().await;
}

#[tokio::test]
async fn unknown_printer_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    let fleet = Fleet::new(manual_config(), vec![binding(&ender, "usb0", dir.path())]).unwrap();
    fleet.start().await.unwrap();

    let err = fleet
        .execute(Command::StartJob {
            printer: "voron".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PrinterNotFound { ref name } if name == "voron"));
    fleet.shutdown().await;
}

#[tokio::test]
async fn host_failure_is_returned_to_caller() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    ender.set_commands_failing(true);
    let fleet = Fleet::new(manual_config(), vec![binding(&ender, "usb0", dir.path())]).unwrap();
    fleet.start().await.unwrap();

    let err = fleet
        .execute(Command::Preheat {
            printer: "ender3".into(),
            level: HeatLevel::Low,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotOperational { .. }));
    // The bed target is not attempted after the tool target fails.
    assert_eq!(ender.calls(), vec!["tool 200"]);
    fleet.shutdown().await;
}

#[tokio::test]
async fn duplicate_printer_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = MockPrinter::new("ender3");
    let b = MockPrinter::new("ender3");
    let result = Fleet::new(
        manual_config(),
        vec![binding(&a, "usb0", dir.path()), binding(&b, "usb1", dir.path())],
    );
    assert!(matches!(result, Err(CoreError::Config { .. })));
}

#[tokio::test]
async fn second_start_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    let fleet = Fleet::new(manual_config(), vec![binding(&ender, "usb0", dir.path())]).unwrap();
    fleet.start().await.unwrap();

    let err = fleet.start().await.unwrap_err();
    assert!(matches!(err, CoreError::AlreadyStarted));

    fleet
        .execute(Command::StartJob {
            printer: "ender3".into(),
        })
        .await
        .unwrap();
    assert_eq!(ender.calls(), vec!["start"]);
    fleet.shutdown().await;
}

#[tokio::test]
async fn execute_after_shutdown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ender = MockPrinter::new("ender3");
    let fleet = Fleet::new(manual_config(), vec![binding(&ender, "usb0", dir.path())]).unwrap();
    fleet.start().await.unwrap();
    fleet.shutdown().await;

    let err = fleet
        .execute(Command::StartJob {
            printer: "ender3".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotRunning));
    assert!(ender.calls().is_empty());
}

#[tokio::test]
async fn oneshot_runs_closure_and_loads_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cube.gcode"), "").unwrap();
    let ender = MockPrinter::new("ender3");

    let files = Fleet::oneshot(
        FleetConfig::default(),
        vec![binding(&ender, "usb0", dir.path())],
        |fleet| async move {
            fleet
                .execute(Command::Extrude {
                    printer: "ender3".into(),
                    amount_mm: 5,
                })
                .await?;
            Ok(fleet.current_dashboard().await.printers[0].file_catalog.clone())
        },
    )
    .await
    .unwrap();

    assert!(files.contains("cube.gcode"));
    assert_eq!(ender.calls(), vec!["extrude 5"]);
}
