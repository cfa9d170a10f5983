//! Task recording.

use std::io::Write;

use anyhow::{Context, Result};

use bt_core::{Session, TaskStatus};
use bt_db::Database;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// What was done.
    #[arg(short, long)]
    pub description: String,

    /// Task progress: started, in_progress, completed or pending.
    #[arg(short, long, default_value = "completed")]
    pub status: TaskStatus,

    /// Free-form duration, e.g. "15dk" or "1h30m".
    #[arg(long)]
    pub duration: Option<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    session: Option<&Session>,
    args: &Args,
) -> Result<()> {
    let event = db
        .record_task(
            session,
            &args.description,
            args.status,
            args.duration.clone(),
        )
        .context("failed to record task")?;

    match event.duration() {
        Some(duration) => writeln!(
            writer,
            "Recorded task \"{}\" ({}, {duration})",
            event.description, args.status
        )?,
        None => writeln!(
            writer,
            "Recorded task \"{}\" ({})",
            event.description, args.status
        )?,
    }
    Ok(())
}
