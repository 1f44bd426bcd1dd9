//! Response schemas for the OctoPrint status endpoints
//!
//! Only the fields some client operation reads are modelled; everything else in
//! a response is ignored. Each modelled field is a [`Field`], so a malformed value
//! only affects the operations reading that path, never its siblings.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;

/// A JSON field that may be absent, `null`, or not of the expected type
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Missing or `null`
    Absent,
    /// Present with the expected type
    Present(T),
    /// Present but not convertible; holds the conversion error
    Invalid(String),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    /// Descend into a nested field, keeping the first absence or error
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Field<U>) -> Field<U> {
        match self {
            Field::Present(value) => f(value),
            Field::Absent => Field::Absent,
            Field::Invalid(reason) => Field::Invalid(reason),
        }
    }

    /// The value, if present and well typed
    pub fn value(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Field::Absent);
        }
        Ok(match T::deserialize(value) {
            Ok(value) => Field::Present(value),
            Err(err) => Field::Invalid(err.to_string()),
        })
    }
}

/// `GET /api/printer`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrinterResponse {
    #[serde(default)]
    pub state: Field<PrinterState>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrinterState {
    /// Human readable state, e.g. `Operational`
    #[serde(default)]
    pub text: Field<String>,
    #[serde(default)]
    pub flags: Field<PrinterFlags>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrinterFlags {
    #[serde(default)]
    pub operational: Field<bool>,
}

/// Actual and target temperature of one heater
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemperatureReading {
    #[serde(default)]
    pub actual: Field<f64>,
    #[serde(default)]
    pub target: Field<f64>,
}

/// `GET /api/printer/bed`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BedResponse {
    #[serde(default)]
    pub bed: Field<TemperatureReading>,
}

/// `GET /api/printer/tool`
///
/// Only the first extruder is tracked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolResponse {
    #[serde(default)]
    pub tool0: Field<TemperatureReading>,
}

/// `GET /api/job`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobResponse {
    #[serde(default)]
    pub job: Field<JobInfo>,
    #[serde(default)]
    pub progress: Field<JobProgress>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// Estimated total print time in seconds
    #[serde(default)]
    pub estimated_print_time: Field<f64>,
    #[serde(default)]
    pub file: Field<JobFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub name: Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    /// Percentage of the file already printed
    #[serde(default)]
    pub completion: Field<f64>,
    /// Seconds since the job started
    #[serde(default)]
    pub print_time: Field<f64>,
    /// Estimated seconds until the job finishes
    #[serde(default)]
    pub print_time_left: Field<f64>,
}

/// `GET /api/version`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub server: Field<String>,
}
