// Printer command endpoints
//
// Connection, heater targets, extrusion, jogging, and job control.
// Each call is a JSON `{"command": ...}` POST answered with 204.

use serde_json::json;
use tracing::debug;

use crate::client::OctoPrintClient;
use crate::error::Error;

impl OctoPrintClient {
    /// Connect the host to the printer on `port`.
    ///
    /// `POST /api/connection` with `{"command": "connect", "port": "..."}`
    pub async fn connect(&self, port: &str) -> Result<(), Error> {
        let url = self.api_url("connection")?;
        debug!(port, "connecting printer");
        self.post_command(url, &json!({ "command": "connect", "port": port }))
            .await
    }

    /// Set the hotend target temperature.
    ///
    /// `POST /api/printer/tool` with `{"command": "target", "targets": {"tool0": n}}`
    pub async fn set_tool_target(&self, celsius: u32) -> Result<(), Error> {
        let url = self.api_url("printer/tool")?;
        debug!(celsius, "setting tool target");
        self.post_command(
            url,
            &json!({ "command": "target", "targets": { "tool0": celsius } }),
        )
        .await
    }

    /// Set the bed target temperature.
    ///
    /// `POST /api/printer/bed` with `{"command": "target", "target": n}`
    pub async fn set_bed_target(&self, celsius: u32) -> Result<(), Error> {
        let url = self.api_url("printer/bed")?;
        debug!(celsius, "setting bed target");
        self.post_command(url, &json!({ "command": "target", "target": celsius }))
            .await
    }

    /// Extrude `amount_mm` of filament on the active tool.
    ///
    /// `POST /api/printer/tool` with `{"command": "extrude", "amount": n}`
    pub async fn extrude(&self, amount_mm: u32) -> Result<(), Error> {
        let url = self.api_url("printer/tool")?;
        debug!(amount_mm, "extruding");
        self.post_command(url, &json!({ "command": "extrude", "amount": amount_mm }))
            .await
    }

    /// Move the print head along Z by `z` millimetres (relative).
    ///
    /// `POST /api/printer/printhead` with `{"command": "jog", "z": n}`
    pub async fn jog_z(&self, z: i32) -> Result<(), Error> {
        let url = self.api_url("printer/printhead")?;
        debug!(z, "jogging z");
        self.post_command(url, &json!({ "command": "jog", "z": z }))
            .await
    }

    /// `POST /api/job` with `{"command": "start"}`
    pub async fn start_job(&self) -> Result<(), Error> {
        let url = self.api_url("job")?;
        debug!("starting job");
        self.post_command(url, &json!({ "command": "start" })).await
    }

    /// `POST /api/job` with `{"command": "cancel"}`
    pub async fn cancel_job(&self) -> Result<(), Error> {
        let url = self.api_url("job")?;
        debug!("cancelling job");
        self.post_command(url, &json!({ "command": "cancel" })).await
    }

    /// Select a file from local storage and start printing it.
    ///
    /// `POST /api/files/local/{name}` with `{"command": "select", "print": true}`
    pub async fn print_file(&self, name: &str) -> Result<(), Error> {
        let mut url = self.api_url("files/local/")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(name);
        debug!(name, "printing file");
        self.post_command(url, &json!({ "command": "select", "print": true }))
            .await
    }
}
