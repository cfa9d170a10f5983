//! Activity log listing.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};

use bt_core::{ActivityEvent, ActivityFilter, ActorFilter, filter_activities};
use bt_db::Database;

use super::util::{format_local, truncate, write_json};

/// Filter flags shared by `activity` and `export`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against description and employee name.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Employee email, or "all".
    #[arg(long, default_value = "all")]
    pub employee: ActorFilter,

    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Only applies together with --from.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ActivityFilter {
        ActivityFilter {
            search: self.search.clone(),
            actor: self.employee.clone(),
            from: self.from,
            to: self.to,
        }
    }

    /// Reads the log and applies the filter, most recent first.
    pub fn apply<Tz: TimeZone>(&self, db: &Database, tz: &Tz) -> Result<Vec<ActivityEvent>> {
        if self.to.is_some() && self.from.is_none() {
            tracing::warn!("--to without --from is ignored");
        }
        let events = db
            .list_activities(None)
            .context("failed to read activities")?;
        Ok(filter_activities(&events, &self.to_filter(), tz))
    }
}

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W, Tz>(writer: &mut W, db: &Database, args: &Args, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let events = args.filter.apply(db, tz)?;
    if args.json {
        return write_json(writer, &events);
    }

    if events.is_empty() {
        writeln!(writer, "No activities match.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<16}  {:<18}  {:<13}  {:<11}  DESCRIPTION",
        "TIME", "EMPLOYEE", "TYPE", "STATUS"
    )?;
    for event in &events {
        writeln!(
            writer,
            "{:<16}  {:<18}  {:<13}  {:<11}  {}",
            format_local(&event.timestamp, tz),
            truncate(&event.actor_name, 18),
            event.event_type().to_string(),
            event.status_label().unwrap_or("-"),
            event.description
        )?;
    }
    Ok(())
}
