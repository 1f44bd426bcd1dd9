//! octoctl-client: blocking client for the OctoPrint REST API
//!
//! Translates typed method calls into requests against the OctoPrint `/api`
//! endpoints, checks the status code each endpoint answers with on success, and
//! extracts typed values from the JSON responses.
//!
//! # Examples
//!
//! ```no_run
//! use octoctl_client::{ClientError, PrinterClient};
//!
//! # fn example() -> Result<(), ClientError> {
//! let client = PrinterClient::new("octopi.local", 80, "API_KEY")?;
//!
//! if client.is_printer_connected()? {
//!     println!("Progress: {}%", client.get_print_progress()?);
//!     println!("Time left: {}s", client.get_print_time_left()?);
//! }
//!
//! // Heat the bed and home all axes
//! client.set_bed_temp(60)?;
//! client.send_gcode(["G28"])?;
//! # Ok(())
//! # }
//! ```
//!
//! Errors distinguish requests that never got an answer
//! ([`ClientError::Transport`]), answers with an unexpected status
//! ([`ClientError::Request`]), unreadable bodies ([`ClientError::ResponseParse`])
//! and arguments rejected before sending ([`ClientError::Validation`]).

pub mod config;
pub mod error;
pub mod http;

pub use config::{ClientConfig, ResumeMode};
pub use error::{ClientError, Result};
pub use http::PrinterClient;
pub use octoctl_api::{ConnectionOptions, FileLocation};
