//! Actions the CLI can perform
//!
//! Each invocation maps to exactly one [`Action`], which knows which client
//! operation to call and how its result is printed.

use std::fmt;

use octoctl_api::{ConnectionOptions, FileLocation};
use octoctl_client::{PrinterClient, Result};

/// One remote operation together with its validated arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PrinterConnected,
    PrinterStatus,
    Connect(ConnectionOptions),
    PrintProgress,
    TotalTime,
    TimeLeft,
    ElapsedTime,
    PrintingFile,
    SendGcode(Vec<String>),
    SelectFile {
        location: FileLocation,
        name: String,
        print: bool,
    },
    ExtruderTemp,
    ExtruderTarget,
    SetBedTemp(i32),
    BedTemp,
    Pause,
    Resume,
    Start,
    Cancel,
    ServerVersion,
}

/// Value produced by an action
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Fire-and-forget command; nothing to print
    Done,
    Bool(bool),
    Number(f64),
    Seconds(u64),
    Text(String),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Done => Ok(()),
            Output::Bool(value) => write!(f, "{value}"),
            Output::Number(value) => write!(f, "{value}"),
            Output::Seconds(value) => write!(f, "{value}"),
            Output::Text(value) => f.write_str(value),
        }
    }
}

impl Action {
    /// Short name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::PrinterConnected => "printer-connected",
            Action::PrinterStatus => "printer-status",
            Action::Connect(_) => "connect",
            Action::PrintProgress => "print-progress",
            Action::TotalTime => "total-time",
            Action::TimeLeft => "left-time",
            Action::ElapsedTime => "elapsed-time",
            Action::PrintingFile => "printing-file",
            Action::SendGcode(_) => "send-gcode",
            Action::SelectFile { .. } => "select-file",
            Action::ExtruderTemp => "ext-temp",
            Action::ExtruderTarget => "ext-target",
            Action::SetBedTemp(_) => "set-bed-temp",
            Action::BedTemp => "get-bed-temp",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Start => "start",
            Action::Cancel => "cancel",
            Action::ServerVersion => "octo-version",
        }
    }

    /// Invoke the matching client operation
    ///
    /// # Errors
    /// Returns whatever error the client operation returns.
    pub fn run(self, client: &PrinterClient) -> Result<Output> {
        let output = match self {
            Action::PrinterConnected => Output::Bool(client.is_printer_connected()?),
            Action::PrinterStatus => Output::Text(client.get_printer_status()?),
            Action::Connect(options) => {
                client.connect_to_printer(&options)?;
                Output::Done
            }
            Action::PrintProgress => Output::Number(client.get_print_progress()?),
            Action::TotalTime => Output::Seconds(client.get_total_print_time()?),
            Action::TimeLeft => Output::Seconds(client.get_print_time_left()?),
            Action::ElapsedTime => Output::Seconds(client.get_elapsed_print_time()?),
            Action::PrintingFile => Output::Text(client.get_file_printing()?),
            Action::SendGcode(commands) => {
                client.send_gcode(commands)?;
                Output::Done
            }
            Action::SelectFile {
                location,
                name,
                print,
            } => {
                client.select_file_at(location, &name, print)?;
                Output::Done
            }
            Action::ExtruderTemp => Output::Number(client.get_extruder_current_temp()?),
            Action::ExtruderTarget => Output::Number(client.get_extruder_target_temp()?),
            Action::SetBedTemp(target) => {
                client.set_bed_temp(target)?;
                Output::Done
            }
            Action::BedTemp => Output::Number(client.get_bed_temp()?),
            Action::Pause => {
                client.pause_job()?;
                Output::Done
            }
            Action::Resume => {
                client.resume_job()?;
                Output::Done
            }
            Action::Start => {
                client.start_job()?;
                Output::Done
            }
            Action::Cancel => {
                client.cancel_job()?;
                Output::Done
            }
            Action::ServerVersion => Output::Text(client.get_version()?),
        };
        Ok(output)
    }
}
