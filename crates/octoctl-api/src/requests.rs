//! Request bodies for the OctoPrint command endpoints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /api/connection`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ConnectionCommand {
    /// Connect to the printer, optionally overriding the stored connection settings
    Connect(ConnectionOptions),
}

/// Optional settings forwarded with a connect command
///
/// Every field left as `None` is omitted from the request body, which tells the
/// server to fall back to its own stored value (or auto detection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
    /// Serial port, e.g. `/dev/ttyACM0` or `COM3`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Serial baud rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baudrate: Option<u32>,
    /// Printer profile identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_profile: Option<String>,
    /// Persist these settings on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
    /// Connect automatically on the next server start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoconnect: Option<bool>,
}

impl ConnectionOptions {
    /// Set the serial port
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set the baud rate
    #[must_use]
    pub fn baudrate(mut self, baudrate: u32) -> Self {
        self.baudrate = Some(baudrate);
        self
    }

    /// Set the printer profile
    #[must_use]
    pub fn printer_profile(mut self, profile: impl Into<String>) -> Self {
        self.printer_profile = Some(profile.into());
        self
    }

    /// Set whether the settings should be saved
    #[must_use]
    pub fn save(mut self, save: bool) -> Self {
        self.save = Some(save);
        self
    }

    /// Set whether to autoconnect on server start
    #[must_use]
    pub fn autoconnect(mut self, autoconnect: bool) -> Self {
        self.autoconnect = Some(autoconnect);
        self
    }
}

/// Body of `POST /api/job`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum JobCommand {
    /// Start printing the selected file
    Start,
    /// Cancel the running job
    Cancel,
    /// Pause, resume or toggle the running job
    Pause {
        /// Without an action the server toggles between paused and printing
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<PauseAction>,
    },
}

/// Explicit action of a pause command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseAction {
    Pause,
    Resume,
    Toggle,
}

/// Body of `POST /api/printer/bed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum BedCommand {
    /// Set the target temperature in degrees Celsius
    Target { target: i32 },
}

/// Body of `POST /api/printer/command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbitraryCommand {
    /// G-code lines, sent in order
    pub commands: Vec<String>,
}

/// Body of `POST /api/files/{location}/{path}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum FileCommand {
    /// Select the file, optionally starting the print right away
    Select { print: bool },
}

/// Storage a file lives on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLocation {
    /// Server-side upload folder
    #[default]
    Local,
    /// Printer's SD card
    Sdcard,
}

impl FileLocation {
    /// Path segment used by the files API
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FileLocation::Local => "local",
            FileLocation::Sdcard => "sdcard",
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown file location name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown file location '{0}', expected 'local' or 'sdcard'")]
pub struct ParseLocationError(pub String);

impl FromStr for FileLocation {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(FileLocation::Local),
            "sdcard" => Ok(FileLocation::Sdcard),
            _ => Err(ParseLocationError(s.to_string())),
        }
    }
}
