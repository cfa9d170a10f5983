//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{activity, clock, export, leave, members, personnel, task, watch};

/// Business operations tracker.
///
/// Keeps the personnel roster, clock-in/clock-out events, tasks, leave requests
/// and memberships, and derives who is currently on site from the activity log.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as the registered person with this email.
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the personnel roster.
    #[command(subcommand)]
    Personnel(personnel::Action),

    /// Record a clock-in or clock-out.
    Clock {
        #[command(subcommand)]
        direction: clock::Direction,
    },

    /// Record a task.
    Task(task::Args),

    /// Show the activity log.
    Activity(activity::Args),

    /// Export the activity log as CSV.
    Export(export::Args),

    /// Submit and resolve leave requests.
    #[command(subcommand)]
    Leave(leave::Action),

    /// Manage memberships.
    #[command(subcommand)]
    Members(members::Action),

    /// Reprint the presence board whenever it changes.
    Watch(watch::Args),
}
