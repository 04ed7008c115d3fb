use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::settings::DEFAULT_CONFIG_PATH;

/// Sync the latest on-device health metrics to a remote API.
///
/// A short-lived session token is read from APPLE_HEALTH_SESSION_TOKEN or
/// prompted for at send time; it is never stored.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request read access to steps, resting heart rate and sleep
    Authorize,
    /// Authorize, then fetch and print the latest metrics
    Fetch,
    /// Authorize, fetch, and upload the metrics with a session token
    Send,
}
