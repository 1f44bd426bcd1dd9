//! octoctl CLI
//!
//! Command-line interface for querying and controlling an OctoPrint server

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use octoctl_client::{PrinterClient, ResumeMode};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod action;
mod cli;
mod config;

use action::Output;
use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse arguments
    let cli = Cli::parse();
    if let Err(err) = cli.validate() {
        err.exit();
    }

    // Load configuration
    let config_path = Config::locate(cli.config.as_deref())?;
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Initialize logging
    init_tracing(cli.verbose, &config.log_level);
    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded configuration"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let action = cli.action().ok_or_else(|| eyre!("no action given"))?;
    let resume_mode = if cli.explicit_resume {
        ResumeMode::Explicit
    } else {
        config.printer.resume_mode
    };

    let client_config = config.client_config(cli.host, cli.port, cli.api_key)?;
    let client = PrinterClient::from_config(client_config)?.with_resume_mode(resume_mode);

    tracing::info!(
        action = action.name(),
        host = client.config().host(),
        port = client.config().port(),
        "running action"
    );
    let output = action.run(&client)?;

    if output != Output::Done {
        println!("{output}");
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`, which wins over the config file
fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
