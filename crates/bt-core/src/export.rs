//! Delimited-text export of the activity log.

use std::fmt::Display;
use std::io::{self, Write};

use chrono::{DateTime, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::activity::ActivityEvent;

/// Column titles, written unquoted on the first line.
pub const HEADERS: [&str; 7] = [
    "Timestamp",
    "Employee Name",
    "Employee Email",
    "Description",
    "Event Type",
    "Status",
    "Duration",
];

/// Timestamp layout of the first column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode export row: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes `events` as CSV, in the order given.
///
/// The header row is plain comma-joined titles. Every data cell is quoted and
/// embedded quotes are doubled. Timestamps are rendered in `tz`.
pub fn export_csv<W, Tz>(
    mut writer: W,
    events: &[ActivityEvent],
    tz: &Tz,
) -> Result<(), ExportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(writer, "{}", HEADERS.join(","))?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for event in events {
        let timestamp = event
            .timestamp
            .with_timezone(tz)
            .format(TIMESTAMP_FORMAT)
            .to_string();
        let event_type = event.event_type().to_string();
        rows.write_record([
            timestamp.as_str(),
            event.actor_name.as_str(),
            event.actor_email.as_str(),
            event.description.as_str(),
            event_type.as_str(),
            event.status_label().unwrap_or(""),
            event.duration().unwrap_or(""),
        ])?;
    }

    rows.flush()?;
    Ok(())
}

/// File name offered for an export taken at `now`.
pub fn export_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("activities_{}.csv", now.format("%Y%m%d%H%M%S"))
}
