// Shared test fixtures: a scriptable in-memory printer host.

#![allow(dead_code, clippy::unwrap_used)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use printdash_core::{
    ConnectionReport, ConnectionState, CoreError, JobProgress, PrinterBinding, PrinterClient,
    PrinterSettings, Temperature,
};

#[derive(Debug, Clone)]
struct Script {
    report: ConnectionReport,
    temperatures: Vec<Temperature>,
    job: JobProgress,
    fail_status: bool,
    fail_commands: bool,
    delay: Duration,
}

/// Printer host double. Status reads return the scripted values; commands
/// are recorded in call order.
pub struct MockPrinter {
    name: String,
    script: Mutex<Script>,
    calls: Mutex<Vec<String>>,
    job_fetches: Mutex<usize>,
}

impl MockPrinter {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            script: Mutex::new(Script {
                report: ConnectionReport::default(),
                temperatures: Vec::new(),
                job: JobProgress::default(),
                fail_status: false,
                fail_commands: false,
                delay: Duration::ZERO,
            }),
            calls: Mutex::new(Vec::new()),
            job_fetches: Mutex::new(0),
        })
    }

    /// Report `state` with `selected` in use out of `ports`.
    pub fn set_connection(&self, state: ConnectionState, selected: &str, ports: &[&str]) {
        let mut script = self.script.lock().unwrap();
        script.report = ConnectionReport {
            state,
            selected_port: selected.to_owned(),
            available_ports: ports.iter().map(|p| (*p).to_owned()).collect(),
        };
    }

    pub fn set_temperatures(&self, temperatures: Vec<Temperature>) {
        self.script.lock().unwrap().temperatures = temperatures;
    }

    pub fn set_job(&self, job: JobProgress) {
        self.script.lock().unwrap().job = job;
    }

    pub fn set_failing(&self, failing: bool) {
        self.script.lock().unwrap().fail_status = failing;
    }

    pub fn set_commands_failing(&self, failing: bool) {
        self.script.lock().unwrap().fail_commands = failing;
    }

    /// Delay every status read by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.script.lock().unwrap().delay = delay;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn job_fetches(&self) -> usize {
        *self.job_fetches.lock().unwrap()
    }

    fn script(&self) -> Script {
        self.script.lock().unwrap().clone()
    }

    async fn status_read(&self) -> Result<Script, CoreError> {
        let script = self.script();
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        if script.fail_status {
            return Err(CoreError::ConnectionFailed {
                url: format!("http://{}.local/", self.name),
                reason: "connection refused".into(),
            });
        }
        Ok(script)
    }

    fn record(&self, call: String) -> Result<(), CoreError> {
        self.calls.lock().unwrap().push(call);
        if self.script().fail_commands {
            return Err(CoreError::NotOperational {
                message: "Printer is not operational".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PrinterClient for MockPrinter {
    async fn settings(&self) -> Result<PrinterSettings, CoreError> {
        self.status_read().await?;
        Ok(PrinterSettings {
            display_name: self.name.to_uppercase(),
            color: Some("default".into()),
            webcam_url: None,
        })
    }

    async fn connection_info(&self) -> Result<ConnectionReport, CoreError> {
        Ok(self.status_read().await?.report)
    }

    async fn temperature_info(&self) -> Result<Vec<Temperature>, CoreError> {
        Ok(self.status_read().await?.temperatures)
    }

    async fn job_info(&self) -> Result<JobProgress, CoreError> {
        *self.job_fetches.lock().unwrap() += 1;
        Ok(self.status_read().await?.job)
    }

    async fn connect(&self, port: &str) -> Result<(), CoreError> {
        self.record(format!("connect {port}"))
    }

    async fn set_tool_target(&self, celsius: u32) -> Result<(), CoreError> {
        self.record(format!("tool {celsius}"))
    }

    async fn set_bed_target(&self, celsius: u32) -> Result<(), CoreError> {
        self.record(format!("bed {celsius}"))
    }

    async fn extrude(&self, amount_mm: u32) -> Result<(), CoreError> {
        self.record(format!("extrude {amount_mm}"))
    }

    async fn start_job(&self) -> Result<(), CoreError> {
        self.record("start".into())
    }

    async fn cancel_job(&self) -> Result<(), CoreError> {
        self.record("cancel".into())
    }

    async fn jog_z(&self, z: i32) -> Result<(), CoreError> {
        self.record(format!("jog z {z}"))
    }

    async fn print_file(&self, file_name: &str) -> Result<(), CoreError> {
        self.record(format!("print {file_name}"))
    }
}

pub fn binding(printer: &Arc<MockPrinter>, host_key: &str, dir: &Path) -> PrinterBinding {
    PrinterBinding {
        name: printer.name.clone(),
        host_key: host_key.to_owned(),
        gcode_directory: dir.to_path_buf(),
        client: Arc::clone(printer) as Arc<dyn PrinterClient>,
    }
}
