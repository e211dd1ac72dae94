//! Dashboard status: one poll cycle, then render printers or ports.

use tabled::Tabled;

use printdash_core::{Fleet, FleetConfig, Port, PrinterBinding, PrinterHandle, Temperature};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PrinterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Hotend")]
    hotend: String,
    #[tabled(rename = "Bed")]
    bed: String,
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Files")]
    files: usize,
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    name: String,
    #[tabled(rename = "Host")]
    host_key: String,
    #[tabled(rename = "Available")]
    available: String,
}

fn printer_row(p: &PrinterHandle, color: bool) -> PrinterRow {
    PrinterRow {
        name: p.name.clone(),
        state: output::state_label(p.connection_state, color),
        port: dash_if_empty(&p.selected_port),
        hotend: heater(&p.temperatures, "tool0"),
        bed: heater(&p.temperatures, "bed"),
        job: job_summary(p),
        files: p.file_catalog.len(),
    }
}

impl From<&Port> for PortRow {
    fn from(p: &Port) -> Self {
        Self {
            name: p.name.clone(),
            host_key: p.host_key.clone(),
            available: if p.available { "yes" } else { "no" }.into(),
        }
    }
}

// ── Formatting helpers ──────────────────────────────────────────────

fn dash_if_empty(s: &str) -> String {
    if s.is_empty() { "-".into() } else { s.to_owned() }
}

fn heater(temps: &[Temperature], name: &str) -> String {
    temps
        .iter()
        .find(|t| t.heater == name)
        .map_or_else(|| "-".into(), format_temperature)
}

fn format_temperature(t: &Temperature) -> String {
    match (t.actual, t.target) {
        (Some(actual), Some(target)) if target > 0.0 => format!("{actual:.1}/{target:.0}°C"),
        (Some(actual), _) => format!("{actual:.1}°C"),
        (None, _) => "-".into(),
    }
}

fn job_summary(p: &PrinterHandle) -> String {
    let Some(ref job) = p.job else {
        return "-".into();
    };
    let file = job.file_name.as_deref().unwrap_or("?");
    job.completion_pct
        .map_or_else(|| file.to_owned(), |pct| format!("{file} {pct:.0}%"))
}

fn detail(p: &PrinterHandle) -> String {
    let mut lines = vec![
        format!("Name:     {}", p.name),
        format!(
            "Display:  {}",
            p.settings.as_ref().map_or("-", |s| s.display_name.as_str())
        ),
        format!("Host:     {}", p.host_key),
        format!("State:    {}", p.connection_state),
        format!("Port:     {}", dash_if_empty(&p.selected_port)),
        format!("Ports:    {}", p.available_ports.join(", ")),
        format!("G-code:   {}", p.gcode_directory.display()),
        format!("Files:    {}", p.file_catalog.len()),
    ];
    for t in &p.temperatures {
        lines.push(format!("{:<9} {}", format!("{}:", t.heater), format_temperature(t)));
    }
    if let Some(ref job) = p.job {
        lines.push(format!("Job:      {}", job_summary(p)));
        if let Some(left) = job.print_time_left_secs {
            lines.push(format!("Left:     {}m{:02}s", left / 60, left % 60));
        }
    }
    if let Some(webcam) = p.settings.as_ref().and_then(|s| s.webcam_url.as_deref()) {
        lines.push(format!("Webcam:   {webcam}"));
    }
    if let Some(ref error) = p.last_error {
        lines.push(format!("Error:    {error}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: FleetConfig,
    bindings: Vec<PrinterBinding>,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dashboard = Fleet::oneshot(config, bindings, |fleet| async move {
        fleet.poll_once().await;
        Ok(fleet.current_dashboard().await)
    })
    .await?;

    let color = output::should_color(&global.color);

    let rendered = if args.ports {
        let ports = dashboard.ports.to_vec();
        output::render_list(&global.output, &ports, |p| PortRow::from(p), |p| {
            format!("{}@{}", p.name, p.host_key)
        })?
    } else if let Some(name) = args.printer {
        let printer = dashboard
            .printer(&name)
            .ok_or_else(|| CliError::PrinterNotFound { name: name.clone() })?;
        output::render_single(&global.output, printer, detail, |p| {
            p.connection_state.to_string()
        })?
    } else {
        output::render_list(
            &global.output,
            &dashboard.printers,
            |p| printer_row(p, color),
            |p| p.name.clone(),
        )?
    };

    output::print_output(&rendered, global.quiet);
    Ok(())
}
