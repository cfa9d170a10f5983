//! Clock-in and clock-out.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::TimeZone;
use clap::Subcommand;

use bt_core::Session;
use bt_db::Database;

use super::util::format_local;

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Direction {
    /// Record arrival.
    In,
    /// Record departure.
    Out,
}

pub fn run<W, Tz>(
    writer: &mut W,
    db: &mut Database,
    session: Option<&Session>,
    direction: Direction,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let event = match direction {
        Direction::In => db.clock_in(session),
        Direction::Out => db.clock_out(session),
    }
    .context("failed to record clock event")?;

    writeln!(
        writer,
        "{} ({})",
        event.description,
        format_local(&event.timestamp, tz)
    )?;
    Ok(())
}
