//! Clap derive structures for the `printdash` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// printdash -- one dashboard for a fleet of OctoPrint printers
#[derive(Debug, Parser)]
#[command(
    name = "printdash",
    version,
    about = "Monitor and drive a fleet of OctoPrint printers",
    long_about = "Polls every printer in the fleet, keeps a shared registry of serial\n\
        ports across hosts, and tracks the G-code files available to each printer.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Printer list (YAML)
    #[arg(
        long,
        env = "PRINTDASH_PRINTERS",
        default_value = "/etc/print-simple/printer-list.yaml",
        global = true
    )]
    pub printers: PathBuf,

    /// Daemon settings file (TOML)
    #[arg(long, env = "PRINTDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PRINTDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the poller and file watcher until interrupted
    Run,

    /// Poll every printer once and show the dashboard
    #[command(alias = "st")]
    Status(StatusArgs),

    /// List the G-code files available to each printer
    #[command(alias = "ls")]
    Files(FilesArgs),

    /// Open a printer's serial connection
    Connect {
        /// Printer name
        printer: String,
        /// Serial port, e.g. /dev/ttyUSB0
        port: String,
    },

    /// Set both heaters to a preset (0 off, 1 low, 2 high)
    Preheat {
        /// Printer name
        printer: String,
        /// Heat level
        #[arg(value_parser = clap::value_parser!(u8).range(0..=2))]
        level: u8,
    },

    /// Push filament through the hotend
    Extrude {
        /// Printer name
        printer: String,
        /// Length in millimetres
        #[arg(long, short = 'a', default_value_t = printdash_core::DEFAULT_EXTRUDE_MM)]
        amount: u32,
    },

    /// Start or cancel the loaded job
    Job(JobArgs),

    /// Jog the Z axis by a relative distance
    #[command(name = "move-z")]
    MoveZ {
        /// Printer name
        printer: String,
        /// Distance in millimetres (negative moves down)
        #[arg(allow_hyphen_values = true)]
        z: i32,
    },

    /// Select a file from local storage and print it
    Print {
        /// Printer name
        printer: String,
        /// File name as listed by `printdash files`
        file: String,
    },
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Show only this printer, in detail
    pub printer: Option<String>,

    /// Show the port registry instead of printers
    #[arg(long, conflicts_with = "printer")]
    pub ports: bool,
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilesArgs {
    /// Show only this printer's files
    pub printer: Option<String>,
}

// ── Job ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// Start the loaded job
    Start {
        /// Printer name
        printer: String,
    },
    /// Cancel the running job and switch heaters off
    Cancel {
        /// Printer name
        printer: String,
    },
}
