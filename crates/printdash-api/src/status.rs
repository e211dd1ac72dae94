// Read-only status endpoints
//
// The four calls the dashboard poller issues every cycle.

use crate::client::OctoPrintClient;
use crate::error::Error;
use crate::models::{ConnectionInfo, JobInfo, PrinterStatus, Settings};

impl OctoPrintClient {
    /// `GET /api/settings`
    pub async fn settings(&self) -> Result<Settings, Error> {
        let url = self.api_url("settings")?;
        self.get(url).await
    }

    /// Current connection plus the serial ports the host can see.
    ///
    /// `GET /api/connection`
    pub async fn connection(&self) -> Result<ConnectionInfo, Error> {
        let url = self.api_url("connection")?;
        self.get(url).await
    }

    /// Heater readings. Fails with [`Error::PrinterNotOperational`] while
    /// no printer is connected.
    ///
    /// `GET /api/printer?exclude=sd,state`
    pub async fn printer_status(&self) -> Result<PrinterStatus, Error> {
        let mut url = self.api_url("printer")?;
        url.query_pairs_mut().append_pair("exclude", "sd,state");
        self.get(url).await
    }

    /// `GET /api/job`
    pub async fn job(&self) -> Result<JobInfo, Error> {
        let url = self.api_url("job")?;
        self.get(url).await
    }
}
