//! Command-line arguments

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, ArgGroup, CommandFactory, Parser};
use octoctl_api::{ConnectionOptions, FileLocation};

use crate::action::Action;

/// Query and control an OctoPrint server
#[derive(Parser, Debug)]
#[command(name = "octoctl", version, about, long_about = None)]
#[command(group(ArgGroup::new("action").required(true).multiple(false)))]
pub struct Cli {
    /// OctoPrint host address, the port must not be specified here
    #[arg(long)]
    pub host: Option<String>,

    /// Port on which OctoPrint is running
    #[arg(long)]
    pub port: Option<u16>,

    /// OctoPrint's API key
    #[arg(long = "apikey", value_name = "API_KEY")]
    pub api_key: Option<String>,

    /// Configuration file
    /// [default: $OCTOCTL_CONFIG, ./octoctl.toml, <config dir>/octoctl/octoctl.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    // Printer
    /// Checks if there is a printer connected
    #[arg(long, group = "action")]
    pub printer_connected: bool,

    /// Gets the printer status (Operational, Disconnected, ...)
    #[arg(long, group = "action")]
    pub printer_status: bool,

    /// Connect to the printer, using the server's stored settings unless overridden
    #[arg(long, group = "action")]
    pub connect: bool,

    /// Port where the printer is connected, e.g. /dev/ttyACM0 or COM3
    #[arg(long, value_name = "PORT")]
    pub printer_port: Option<String>,

    /// Baud rate for the connection to the printer
    #[arg(long)]
    pub baudrate: Option<u32>,

    /// Printer profile identifier to connect with
    #[arg(long)]
    pub profile: Option<String>,

    /// Save the connection settings when connecting
    #[arg(long)]
    pub save: bool,

    /// Connect automatically on the next OctoPrint start
    #[arg(long)]
    pub autoconnect: bool,

    // Job
    /// Gets the print progress as percentage
    #[arg(long, group = "action")]
    pub print_progress: bool,

    /// Gets the total print time in seconds
    #[arg(long, group = "action")]
    pub total_time: bool,

    /// Gets the time left for the print to finish, in seconds
    #[arg(long, group = "action")]
    pub left_time: bool,

    /// Gets the elapsed print time, in seconds
    #[arg(long, group = "action")]
    pub elapsed_time: bool,

    /// Gets the name of the file being printed
    #[arg(long, group = "action")]
    pub printing_file: bool,

    /// Sends G-code lines to the printer
    #[arg(long, group = "action", num_args = 1.., value_name = "GCODE")]
    pub send_gcode: Option<Vec<String>>,

    /// Selects an uploaded file and starts printing it
    #[arg(long, group = "action", value_name = "FILE_NAME")]
    pub select_file: Option<String>,

    /// Storage of the file given to --select-file (local or sdcard) [default: local]
    #[arg(long, value_name = "LOCATION")]
    pub location: Option<FileLocation>,

    /// Only select the file given to --select-file, do not start printing
    #[arg(long)]
    pub no_print: bool,

    // Temperatures
    /// Gets the current extruder temperature in degrees Celsius
    #[arg(long, group = "action")]
    pub ext_temp: bool,

    /// Gets the target extruder temperature in degrees Celsius
    #[arg(long, group = "action")]
    pub ext_target: bool,

    /// Sets the bed temperature in degrees Celsius
    #[arg(long, group = "action", value_name = "BED_TEMP", allow_negative_numbers = true)]
    pub set_bed_temp: Option<i32>,

    /// Gets the current bed temperature
    #[arg(long, group = "action")]
    pub get_bed_temp: bool,

    // Job control
    /// Pause the current job
    #[arg(long, group = "action")]
    pub pause: bool,

    /// Resume the current job
    #[arg(long, group = "action")]
    pub resume: bool,

    /// Send an explicit resume action instead of toggling the pause state
    #[arg(long)]
    pub explicit_resume: bool,

    /// Starts printing the currently selected file
    #[arg(long, group = "action")]
    pub start: bool,

    /// Cancel the current job
    #[arg(long, group = "action")]
    pub cancel: bool,

    // Other
    /// Reads the OctoPrint server version
    #[arg(long, group = "action")]
    pub octo_version: bool,
}

impl Cli {
    /// Reject options given without the action they modify
    ///
    /// # Errors
    /// Returns a usage error naming the first such option.
    pub fn validate(&self) -> Result<(), clap::Error> {
        let select_file = self.select_file.is_some();
        let dependents = [
            ("--printer-port", self.printer_port.is_some(), "--connect", self.connect),
            ("--baudrate", self.baudrate.is_some(), "--connect", self.connect),
            ("--profile", self.profile.is_some(), "--connect", self.connect),
            ("--save", self.save, "--connect", self.connect),
            ("--autoconnect", self.autoconnect, "--connect", self.connect),
            ("--location", self.location.is_some(), "--select-file", select_file),
            ("--no-print", self.no_print, "--select-file", select_file),
            ("--explicit-resume", self.explicit_resume, "--resume", self.resume),
        ];

        match dependents
            .into_iter()
            .find(|&(_, given, _, parent_given)| given && !parent_given)
        {
            Some((option, _, parent, _)) => Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                format!("{option} can only be used with {parent}"),
            )),
            None => Ok(()),
        }
    }

    /// The single action selected on the command line
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        let flags = [
            (self.printer_connected, Action::PrinterConnected),
            (self.printer_status, Action::PrinterStatus),
            (self.print_progress, Action::PrintProgress),
            (self.total_time, Action::TotalTime),
            (self.left_time, Action::TimeLeft),
            (self.elapsed_time, Action::ElapsedTime),
            (self.printing_file, Action::PrintingFile),
            (self.ext_temp, Action::ExtruderTemp),
            (self.ext_target, Action::ExtruderTarget),
            (self.get_bed_temp, Action::BedTemp),
            (self.pause, Action::Pause),
            (self.resume, Action::Resume),
            (self.start, Action::Start),
            (self.cancel, Action::Cancel),
            (self.octo_version, Action::ServerVersion),
        ];
        if let Some((_, action)) = flags.into_iter().find(|(set, _)| *set) {
            return Some(action);
        }

        if self.connect {
            return Some(Action::Connect(self.connection_options()));
        }
        if let Some(commands) = &self.send_gcode {
            return Some(Action::SendGcode(commands.clone()));
        }
        if let Some(name) = &self.select_file {
            return Some(Action::SelectFile {
                location: self.location.unwrap_or_default(),
                name: name.clone(),
                print: !self.no_print,
            });
        }
        self.set_bed_temp.map(Action::SetBedTemp)
    }

    /// Options forwarded with `--connect`; flags not given stay unset
    fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            port: self.printer_port.clone(),
            baudrate: self.baudrate,
            printer_profile: self.profile.clone(),
            save: self.save.then_some(true),
            autoconnect: self.autoconnect.then_some(true),
        }
    }
}
