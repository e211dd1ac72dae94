// ── Command system ──
//
// Typed printer commands routed through an mpsc channel to the fleet's
// command processor. Reads bypass the channel and use dashboard snapshots.

mod route;

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::CoreError;

pub(crate) use route::route_command;

/// Default extrusion length, in millimetres.
pub const DEFAULT_EXTRUDE_MM: u32 = 100;

/// Heater preset applied by [`Command::Preheat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatLevel {
    /// Both heaters off.
    Off,
    /// 200 °C hotend, 60 °C bed.
    Low,
    /// 220 °C hotend, 60 °C bed.
    High,
}

impl HeatLevel {
    /// `(tool, bed)` targets in °C.
    pub fn targets(self) -> (u32, u32) {
        match self {
            Self::Off => (0, 0),
            Self::Low => (200, 60),
            Self::High => (220, 60),
        }
    }
}

impl TryFrom<u8> for HeatLevel {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Off),
            1 => Ok(Self::Low),
            2 => Ok(Self::High),
            other => Err(CoreError::ValidationFailed {
                message: format!("heat level must be 0, 1 or 2, got {other}"),
            }),
        }
    }
}

/// A mutation addressed to one printer by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect { printer: String, port: String },
    Preheat { printer: String, level: HeatLevel },
    Extrude { printer: String, amount_mm: u32 },
    StartJob { printer: String },
    /// Cancels the job, then switches both heaters off.
    CancelJob { printer: String },
    MoveZ { printer: String, z: i32 },
    PrintFile { printer: String, file_name: String },
}

impl Command {
    /// Name of the printer this command targets.
    pub fn printer(&self) -> &str {
        match self {
            Self::Connect { printer, .. }
            | Self::Preheat { printer, .. }
            | Self::Extrude { printer, .. }
            | Self::StartJob { printer }
            | Self::CancelJob { printer }
            | Self::MoveZ { printer, .. }
            | Self::PrintFile { printer, .. } => printer,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { port, .. } => write!(f, "connect to {port}"),
            Self::Preheat { level, .. } => write!(f, "preheat {level:?}"),
            Self::Extrude { amount_mm, .. } => write!(f, "extrude {amount_mm}mm"),
            Self::StartJob { .. } => f.write_str("start job"),
            Self::CancelJob { .. } => f.write_str("cancel job"),
            Self::MoveZ { z, .. } => write!(f, "move z {z}mm"),
            Self::PrintFile { file_name, .. } => write!(f, "print {file_name}"),
        }
    }
}

/// A command paired with its reply channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: oneshot::Sender<Result<(), CoreError>>,
}
