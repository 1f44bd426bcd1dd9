//! octoctl-api: OctoPrint wire types
//!
//! Contains the request bodies and response schemas of the OctoPrint REST endpoints
//! used by the client and CLI.

pub mod requests;
pub mod responses;

pub use requests::{
    ArbitraryCommand, BedCommand, ConnectionCommand, ConnectionOptions, FileCommand, FileLocation,
    JobCommand, ParseLocationError, PauseAction,
};
pub use responses::{
    BedResponse, Field, JobResponse, PrinterResponse, ToolResponse, VersionResponse,
};
