// ── Printer command interface ──
//
// The seam between the core and a printer host. The poller only uses the
// four reads; command routing uses the rest. `OctoPrintClient` is the
// production implementation; tests substitute their own.

use async_trait::async_trait;
use printdash_api::OctoPrintClient;

use crate::error::CoreError;
use crate::model::{ConnectionReport, JobProgress, PrinterSettings, Temperature};

/// Operations the core invokes on one printer host.
#[async_trait]
pub trait PrinterClient: Send + Sync {
    // ── Status reads ─────────────────────────────────────────────────
    async fn settings(&self) -> Result<PrinterSettings, CoreError>;
    async fn connection_info(&self) -> Result<ConnectionReport, CoreError>;
    async fn temperature_info(&self) -> Result<Vec<Temperature>, CoreError>;
    async fn job_info(&self) -> Result<JobProgress, CoreError>;

    // ── Commands ─────────────────────────────────────────────────────
    async fn connect(&self, port: &str) -> Result<(), CoreError>;
    async fn set_tool_target(&self, celsius: u32) -> Result<(), CoreError>;
    async fn set_bed_target(&self, celsius: u32) -> Result<(), CoreError>;
    async fn extrude(&self, amount_mm: u32) -> Result<(), CoreError>;
    async fn start_job(&self) -> Result<(), CoreError>;
    async fn cancel_job(&self) -> Result<(), CoreError>;
    async fn jog_z(&self, z: i32) -> Result<(), CoreError>;
    async fn print_file(&self, file_name: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl PrinterClient for OctoPrintClient {
    async fn settings(&self) -> Result<PrinterSettings, CoreError> {
        Ok(OctoPrintClient::settings(self).await?.into())
    }

    async fn connection_info(&self) -> Result<ConnectionReport, CoreError> {
        Ok(self.connection().await?.into())
    }

    async fn temperature_info(&self) -> Result<Vec<Temperature>, CoreError> {
        match self.printer_status().await {
            Ok(status) => Ok(crate::convert::temperatures(status)),
            // No printer on the serial link: nothing to read, not a failure.
            Err(printdash_api::Error::PrinterNotOperational { .. }) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn job_info(&self) -> Result<JobProgress, CoreError> {
        Ok(self.job().await?.into())
    }

    async fn connect(&self, port: &str) -> Result<(), CoreError> {
        Ok(OctoPrintClient::connect(self, port).await?)
    }

    async fn set_tool_target(&self, celsius: u32) -> Result<(), CoreError> {
        Ok(OctoPrintClient::set_tool_target(self, celsius).await?)
    }

    async fn set_bed_target(&self, celsius: u32) -> Result<(), CoreError> {
        Ok(OctoPrintClient::set_bed_target(self, celsius).await?)
    }

    async fn extrude(&self, amount_mm: u32) -> Result<(), CoreError> {
        Ok(OctoPrintClient::extrude(self, amount_mm).await?)
    }

    async fn start_job(&self) -> Result<(), CoreError> {
        Ok(OctoPrintClient::start_job(self).await?)
    }

    async fn cancel_job(&self) -> Result<(), CoreError> {
        Ok(OctoPrintClient::cancel_job(self).await?)
    }

    async fn jog_z(&self, z: i32) -> Result<(), CoreError> {
        Ok(OctoPrintClient::jog_z(self, z).await?)
    }

    async fn print_file(&self, file_name: &str) -> Result<(), CoreError> {
        Ok(OctoPrintClient::print_file(self, file_name).await?)
    }
}
