//! Command-line interface definitions.
//!
//! The agent normally runs with no arguments (equivalent to `retrial
//! agent`); the other subcommands exist for inspection and debugging.
//!
//! # Example
//!
//! ```bash
//! # Run the background agent
//! retrial
//!
//! # Run one reset immediately and print the summary
//! retrial reset jetbrains
//!
//! # Show countdowns to the next scheduled resets
//! retrial status
//!
//! # Verbose mode for debugging
//! retrial -v reset navicat
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Background agent that resets trial-period state for desktop IDE tools.
///
/// Tracks elapsed time since the last reset per product and re-runs the
/// reset on a fixed interval, preserving user settings across each reset.
#[derive(Debug, Parser)]
#[command(name = "retrial")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute; defaults to `agent`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the background agent loop (the default)
    Agent,
    /// Run one reset now and print the summary
    Reset(ResetArgs),
    /// Show the countdown to each product's next scheduled reset
    Status,
    /// Enable or disable launch at login
    Autostart(AutostartArgs),
}

/// Arguments for the reset subcommand.
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Product to reset
    #[arg(value_enum)]
    pub product: ProductArg,
}

/// Arguments for the autostart subcommand.
#[derive(Debug, Args)]
pub struct AutostartArgs {
    /// Desired state
    #[arg(value_enum)]
    pub state: ToggleArg,
}

/// Product selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductArg {
    /// The IDE family
    Jetbrains,
    /// The database tool
    Navicat,
}

/// On/off selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleArg {
    On,
    Off,
}
