//! Blocking HTTP client for the OctoPrint REST API

use octoctl_api::{
    ArbitraryCommand, BedCommand, BedResponse, ConnectionCommand, ConnectionOptions, Field,
    FileCommand, FileLocation, JobCommand, JobResponse, PrinterResponse, ToolResponse,
    VersionResponse,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ClientConfig, ResumeMode};
use crate::error::{ClientError, Result};

const PRINTER: &str = "/api/printer";
const BED: &str = "/api/printer/bed";
const TOOL: &str = "/api/printer/tool";
const COMMAND: &str = "/api/printer/command";
const CONNECTION: &str = "/api/connection";
const JOB: &str = "/api/job";
const VERSION: &str = "/api/version";

/// Client for one OctoPrint server
///
/// Every operation is a single blocking round trip. The underlying connection pool
/// is reused across calls; nothing else is remembered between them.
#[derive(Debug, Clone)]
pub struct PrinterClient {
    client: Client,
    config: ClientConfig,
    base_url: Url,
    resume_mode: ResumeMode,
}

impl PrinterClient {
    /// Create a new client
    ///
    /// No request is sent until an operation is called.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] if the host, port or API key cannot be used
    /// to build requests.
    ///
    /// # Example
    /// ```no_run
    /// use octoctl_client::PrinterClient;
    ///
    /// let client = PrinterClient::new("octopi.local", 80, "API_KEY")?;
    /// println!("{}", client.get_printer_status()?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(host: impl Into<String>, port: u16, api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(host, port, api_key))
    }

    /// Create a new client from an existing configuration
    ///
    /// # Errors
    /// See [`PrinterClient::new`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            ClientError::Validation("API key is not a valid header value".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-api-key"), api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ClientError::Validation(format!("cannot build HTTP client: {err}")))?;

        Ok(Self {
            client,
            config,
            base_url,
            resume_mode: ResumeMode::default(),
        })
    }

    /// Choose the body sent by [`PrinterClient::resume_job`]
    #[must_use]
    pub fn with_resume_mode(mut self, resume_mode: ResumeMode) -> Self {
        self.resume_mode = resume_mode;
        self
    }

    /// Connection settings this client was built from
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Body sent by [`PrinterClient::resume_job`]
    #[must_use]
    pub fn resume_mode(&self) -> ResumeMode {
        self.resume_mode
    }

    /// Build a full URL from an absolute API path
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Validation(format!("invalid path '{path}': {err}")))
    }

    /// Send a request and check the status code
    fn send(&self, request: RequestBuilder, expected: StatusCode) -> Result<Response> {
        let response = request.send().inspect_err(|err| {
            tracing::debug!(error = %err, "request failed before a response was received");
        })?;

        let status = response.status();
        if status != expected {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%status, %expected, "unexpected response status");
            return Err(ClientError::Request {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Perform a GET request expecting `200 OK` and deserialize the response
    fn get<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<T> {
        let url = self.url(path)?;
        tracing::debug!(operation, %url, "GET");

        let response = self.send(self.client.get(url), StatusCode::OK)?;
        let body = response
            .text()
            .map_err(|err| ClientError::parse(operation, format!("cannot read body: {err}")))?;
        serde_json::from_str(&body).map_err(|err| ClientError::parse(operation, err))
    }

    /// Perform a POST request with JSON body, ignoring any response body
    fn post(
        &self,
        operation: &'static str,
        url: Url,
        body: &impl Serialize,
        expected: StatusCode,
    ) -> Result<()> {
        tracing::debug!(operation, %url, "POST");
        self.send(self.client.post(url).json(body), expected)?;
        Ok(())
    }

    /// POST a command expecting `204 No Content`
    fn command(&self, operation: &'static str, path: &str, body: &impl Serialize) -> Result<()> {
        let url = self.url(path)?;
        self.post(operation, url, body, StatusCode::NO_CONTENT)
    }

    // Printer endpoints

    /// Whether the server reports the printer as operational
    ///
    /// # Errors
    /// Returns an error if the request fails or `state.flags.operational` is absent.
    pub fn is_printer_connected(&self) -> Result<bool> {
        const OP: &str = "is_printer_connected";
        let printer: PrinterResponse = self.get(OP, PRINTER)?;
        printer
            .state
            .and_then(|state| state.flags)
            .and_then(|flags| flags.operational)
            .require(OP, "state.flags.operational")
    }

    /// Printer state text, e.g. `Operational` or `Printing`
    ///
    /// # Errors
    /// Returns an error if the request fails or `state.text` is absent.
    pub fn get_printer_status(&self) -> Result<String> {
        const OP: &str = "get_printer_status";
        let printer: PrinterResponse = self.get(OP, PRINTER)?;
        printer.state.and_then(|state| state.text).require(OP, "state.text")
    }

    /// Connect the server to the printer
    ///
    /// Options left unset are omitted from the request, so the server uses its
    /// stored settings or auto detection for them.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server does not answer `204`.
    ///
    /// # Example
    /// ```no_run
    /// # use octoctl_client::PrinterClient;
    /// use octoctl_api::ConnectionOptions;
    ///
    /// let client = PrinterClient::new("octopi.local", 80, "API_KEY")?;
    /// client.connect_to_printer(&ConnectionOptions::default().baudrate(115_200))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn connect_to_printer(&self, options: &ConnectionOptions) -> Result<()> {
        let body = ConnectionCommand::Connect(options.clone());
        self.command("connect_to_printer", CONNECTION, &body)
    }

    /// Set the bed target temperature in degrees Celsius
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] without sending anything if `target` is
    /// negative, otherwise an error if the request fails.
    pub fn set_bed_temp(&self, target: i32) -> Result<()> {
        if target < 0 {
            return Err(ClientError::Validation(format!(
                "bed temperature can't be negative (got {target})"
            )));
        }
        self.command("set_bed_temp", BED, &BedCommand::Target { target })
    }

    /// Current bed temperature in degrees Celsius
    ///
    /// # Errors
    /// Returns an error if the request fails or `bed.actual` is absent.
    pub fn get_bed_temp(&self) -> Result<f64> {
        const OP: &str = "get_bed_temp";
        let bed: BedResponse = self.get(OP, BED)?;
        bed.bed
            .and_then(|bed| bed.actual)
            .require(OP, "bed.actual")
    }

    /// Target temperature of the first extruder in degrees Celsius
    ///
    /// # Errors
    /// Returns an error if the request fails or `tool0.target` is absent.
    pub fn get_extruder_target_temp(&self) -> Result<f64> {
        const OP: &str = "get_extruder_target_temp";
        let tool: ToolResponse = self.get(OP, TOOL)?;
        tool.tool0
            .and_then(|tool| tool.target)
            .require(OP, "tool0.target")
    }

    /// Current temperature of the first extruder in degrees Celsius
    ///
    /// # Errors
    /// Returns an error if the request fails or `tool0.actual` is absent.
    pub fn get_extruder_current_temp(&self) -> Result<f64> {
        const OP: &str = "get_extruder_current_temp";
        let tool: ToolResponse = self.get(OP, TOOL)?;
        tool.tool0
            .and_then(|tool| tool.actual)
            .require(OP, "tool0.actual")
    }

    /// Send G-code lines to the printer, in order
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] without sending anything if no command or a
    /// blank command is given, otherwise an error if the request fails.
    pub fn send_gcode<I, S>(&self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands: Vec<String> = commands.into_iter().map(Into::into).collect();
        if commands.is_empty() {
            return Err(ClientError::Validation(
                "at least one G-code command is required".to_string(),
            ));
        }
        if commands.iter().any(|line| line.trim().is_empty()) {
            return Err(ClientError::Validation(
                "G-code commands must not be blank".to_string(),
            ));
        }
        self.command("send_gcode", COMMAND, &ArbitraryCommand { commands })
    }

    // Job endpoints

    /// Pause the running job
    ///
    /// # Errors
    /// Returns an error if the request fails or the server does not answer `204`.
    pub fn pause_job(&self) -> Result<()> {
        self.command("pause_job", JOB, &JobCommand::Pause { action: None })
    }

    /// Resume the paused job
    ///
    /// With the default [`ResumeMode::Toggle`] this sends the same body as
    /// [`PrinterClient::pause_job`].
    ///
    /// # Errors
    /// Returns an error if the request fails or the server does not answer `204`.
    pub fn resume_job(&self) -> Result<()> {
        self.command("resume_job", JOB, &self.resume_mode.command())
    }

    /// Start printing the selected file
    ///
    /// # Errors
    /// Returns an error if the request fails or the server does not answer `204`.
    pub fn start_job(&self) -> Result<()> {
        self.command("start_job", JOB, &JobCommand::Start)
    }

    /// Cancel the running job
    ///
    /// # Errors
    /// Returns an error if the request fails or the server does not answer `204`.
    pub fn cancel_job(&self) -> Result<()> {
        self.command("cancel_job", JOB, &JobCommand::Cancel)
    }

    /// Completion of the current job in percent
    ///
    /// # Errors
    /// Returns an error if the request fails or `progress.completion` is absent.
    pub fn get_print_progress(&self) -> Result<f64> {
        const OP: &str = "get_print_progress";
        let job: JobResponse = self.get(OP, JOB)?;
        job.progress
            .and_then(|progress| progress.completion)
            .require(OP, "progress.completion")
    }

    /// Estimated total print time in seconds
    ///
    /// # Errors
    /// Returns an error if the request fails or `job.estimatedPrintTime` is absent.
    pub fn get_total_print_time(&self) -> Result<u64> {
        const OP: &str = "get_total_print_time";
        let job: JobResponse = self.get(OP, JOB)?;
        let value = job.job.and_then(|job| job.estimated_print_time);
        whole_seconds(OP, "job.estimatedPrintTime", value)
    }

    /// Estimated seconds until the current job finishes
    ///
    /// # Errors
    /// Returns an error if the request fails or `progress.printTimeLeft` is absent.
    pub fn get_print_time_left(&self) -> Result<u64> {
        const OP: &str = "get_print_time_left";
        let job: JobResponse = self.get(OP, JOB)?;
        let value = job.progress.and_then(|progress| progress.print_time_left);
        whole_seconds(OP, "progress.printTimeLeft", value)
    }

    /// Seconds since the current job started
    ///
    /// # Errors
    /// Returns an error if the request fails or `progress.printTime` is absent.
    pub fn get_elapsed_print_time(&self) -> Result<u64> {
        const OP: &str = "get_elapsed_print_time";
        let job: JobResponse = self.get(OP, JOB)?;
        let value = job.progress.and_then(|progress| progress.print_time);
        whole_seconds(OP, "progress.printTime", value)
    }

    /// Name of the file of the current job
    ///
    /// # Errors
    /// Returns an error if the request fails or `job.file.name` is absent.
    pub fn get_file_printing(&self) -> Result<String> {
        const OP: &str = "get_file_printing";
        let job: JobResponse = self.get(OP, JOB)?;
        job.job
            .and_then(|job| job.file)
            .and_then(|file| file.name)
            .require(OP, "job.file.name")
    }

    // File endpoints

    /// Select a local file and start printing it
    ///
    /// # Errors
    /// See [`PrinterClient::select_file_at`].
    pub fn select_file(&self, file_name: &str) -> Result<()> {
        self.select_file_at(FileLocation::Local, file_name, true)
    }

    /// Select an uploaded file, optionally starting the print right away
    ///
    /// `file_name` may address a sub-folder (`folder/part.gcode`); every segment
    /// is percent-encoded separately.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] without sending anything if the file name is
    /// empty or contains empty, `.` or `..` segments, otherwise an error if the request
    /// fails or the server does not answer `200`.
    pub fn select_file_at(
        &self,
        location: FileLocation,
        file_name: &str,
        print: bool,
    ) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(ClientError::Validation("file name must not be empty".to_string()));
        }
        if file_name
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(ClientError::Validation(format!("invalid file path '{file_name}'")));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Validation(format!("cannot append a path to {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "files", location.as_str()])
            .extend(file_name.split('/'));

        self.post("select_file", url, &FileCommand::Select { print }, StatusCode::OK)
    }

    // System endpoints

    /// OctoPrint server version, e.g. `1.10.2`
    ///
    /// # Errors
    /// Returns an error if the request fails or `server` is absent.
    pub fn get_version(&self) -> Result<String> {
        const OP: &str = "get_version";
        let version: VersionResponse = self.get(OP, VERSION)?;
        version.server.require(OP, "server")
    }
}

/// Turn a response field into the operation's value
trait Require<T> {
    fn require(self, operation: &'static str, path: &str) -> Result<T>;
}

impl<T> Require<T> for Field<T> {
    fn require(self, operation: &'static str, path: &str) -> Result<T> {
        match self {
            Field::Present(value) => Ok(value),
            Field::Absent => Err(ClientError::missing(operation, path)),
            Field::Invalid(reason) => Err(ClientError::parse(
                operation,
                format!("field '{path}' is malformed: {reason}"),
            )),
        }
    }
}

/// Convert a JSON number of seconds to whole seconds, truncating any fraction
fn whole_seconds(operation: &'static str, path: &str, value: Field<f64>) -> Result<u64> {
    let seconds = value.require(operation, path)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ClientError::parse(
            operation,
            format!("field '{path}' is not a valid number of seconds: {seconds}"),
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = seconds.trunc() as u64;
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PrinterClient::new("localhost", 5000, "key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_host() {
        let client = PrinterClient::new("not a host", 5000, "key");
        assert!(matches!(client, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_invalid_api_key() {
        let client = PrinterClient::new("localhost", 5000, "bad\nkey");
        assert!(matches!(client, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_url_building() {
        let client = PrinterClient::new("localhost", 5000, "key").unwrap();
        let url = client.url(JOB).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/job");
    }

    #[test]
    fn test_resume_mode_builder() {
        let client = PrinterClient::new("localhost", 5000, "key").unwrap();
        assert_eq!(client.resume_mode(), ResumeMode::Toggle);
        let client = client.with_resume_mode(ResumeMode::Explicit);
        assert_eq!(client.resume_mode(), ResumeMode::Explicit);
        assert_eq!(client.config().host(), "localhost");
    }

    #[test]
    fn test_whole_seconds() {
        assert_eq!(whole_seconds("op", "a.b", Field::Present(150.0)).unwrap(), 150);
        assert_eq!(
            whole_seconds("op", "a.b", Field::Present(9_875.67)).unwrap(),
            9_875
        );
        assert!(matches!(
            whole_seconds("op", "a.b", Field::Absent),
            Err(ClientError::ResponseParse { operation: "op", .. })
        ));
        assert!(matches!(
            whole_seconds("op", "a.b", Field::Present(-1.0)),
            Err(ClientError::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_require_reports_malformed_field() {
        let err = Field::<f64>::Invalid("expected f64".to_string())
            .require("get_bed_temp", "bed.actual")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to read get_bed_temp response: field 'bed.actual' is malformed: expected f64"
        );
    }
}
