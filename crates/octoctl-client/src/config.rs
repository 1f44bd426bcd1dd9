//! Connection settings for the OctoPrint client

use std::fmt;

use octoctl_api::{JobCommand, PauseAction};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Where and how to reach the OctoPrint server
///
/// Immutable once built; every request of a [`PrinterClient`](crate::PrinterClient)
/// derives its URL and `X-Api-Key` header from it.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host: String,
    port: u16,
    api_key: String,
}

impl ClientConfig {
    /// Create a new configuration
    pub fn new(host: impl Into<String>, port: u16, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            api_key: api_key.into(),
        }
    }

    /// Server host name or address, without scheme or port
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server TCP port
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// API key sent in the `X-Api-Key` header
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build `http://{host}:{port}/`
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] if host and port do not form a plain origin.
    pub fn base_url(&self) -> Result<Url> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Validation("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::Validation("port must not be 0".to_string()));
        }

        let raw = format!("http://{}:{}/", self.host, self.port);
        let url = Url::parse(&raw).map_err(|err| {
            ClientError::Validation(format!("invalid host '{}': {err}", self.host))
        })?;

        // A host like "octopi/api" or "user@octopi" parses fine but is not an origin
        if url.host_str().is_none()
            || url.path() != "/"
            || url.port_or_known_default() != Some(self.port)
            || !url.username().is_empty()
        {
            return Err(ClientError::Validation(format!(
                "invalid host '{}': expected a bare host name or address",
                self.host
            )));
        }

        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Body sent by [`PrinterClient::resume_job`](crate::PrinterClient::resume_job)
///
/// OctoPrint has no dedicated resume command. A bare `pause` command toggles the
/// pause state, so it resumes a paused job but pauses a running one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeMode {
    /// `{"command":"pause"}`
    #[default]
    Toggle,
    /// `{"command":"pause","action":"resume"}`
    Explicit,
}

impl ResumeMode {
    pub(crate) fn command(self) -> JobCommand {
        match self {
            ResumeMode::Toggle => JobCommand::Pause { action: None },
            ResumeMode::Explicit => JobCommand::Pause {
                action: Some(PauseAction::Resume),
            },
        }
    }
}
