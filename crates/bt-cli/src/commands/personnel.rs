//! Personnel roster commands and the presence board.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::TimeZone;
use clap::Subcommand;

use bt_core::{Email, PersonId, Role, RosterEntry, Session, require_session, roster_status};
use bt_db::Database;

use super::util::{format_local, truncate, write_json};

#[derive(Debug, Subcommand)]
pub enum Action {
    /// List everyone with their current presence.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Register a person.
    Add {
        /// Full name.
        #[arg(long)]
        name: String,

        /// Email address; identifies the person.
        #[arg(long)]
        email: Email,

        /// Access level.
        #[arg(long, default_value = "employee")]
        role: Role,
    },

    /// Remove a person. Requires an admin session.
    Remove {
        /// Person id as shown by `bt personnel list`.
        id: String,
    },
}

pub fn run<W, Tz>(
    writer: &mut W,
    db: &mut Database,
    session: Option<&Session>,
    action: &Action,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match action {
        Action::List { json } => list(writer, db, *json, tz),
        Action::Add { name, email, role } => add(writer, db, name, email, *role),
        Action::Remove { id } => remove(writer, db, session, id),
    }
}

/// Current roster with presence derived from the full activity log.
pub fn load_roster(db: &Database) -> Result<Vec<RosterEntry>> {
    let people = db.list_people().context("failed to read personnel")?;
    let events = db
        .list_activities(None)
        .context("failed to read activities")?;
    Ok(roster_status(&people, &events))
}

fn list<W, Tz>(writer: &mut W, db: &Database, json: bool, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let roster = load_roster(db)?;
    if json {
        return write_json(writer, &roster);
    }
    write_roster(writer, &roster, tz)
}

/// Writes the presence board as a table.
pub fn write_roster<W, Tz>(writer: &mut W, roster: &[RosterEntry], tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if roster.is_empty() {
        writeln!(writer, "No personnel registered.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<20}  {:<26}  {:<8}  {:<7}  {:<22}  ID",
        "NAME", "EMAIL", "ROLE", "STATUS", "LAST EVENT"
    )?;
    for entry in roster {
        let last_event = match (entry.status.last_event_type, entry.status.last_event_at) {
            (Some(event_type), Some(at)) => format!("{event_type} {}", format_local(&at, tz)),
            _ => "-".to_string(),
        };
        writeln!(
            writer,
            "{:<20}  {:<26}  {:<8}  {:<7}  {:<22}  {}",
            truncate(&entry.person.name, 20),
            truncate(entry.person.email.as_str(), 26),
            entry.person.role.as_str(),
            entry.status.presence.as_str(),
            last_event,
            entry.person.id
        )?;
    }
    Ok(())
}

fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    name: &str,
    email: &Email,
    role: Role,
) -> Result<()> {
    let person = db
        .add_person(name, email, role)
        .context("failed to register person")?;
    writeln!(
        writer,
        "Registered {} <{}> as {} ({})",
        person.name, person.email, person.role, person.id
    )?;
    Ok(())
}

fn remove<W: Write>(
    writer: &mut W,
    db: &mut Database,
    session: Option<&Session>,
    id: &str,
) -> Result<()> {
    require_session(session)?.require_admin()?;
    let id = PersonId::new(id)?;
    db.remove_person(&id)
        .with_context(|| format!("failed to remove person {id}"))?;
    writeln!(writer, "Removed {id}")?;
    Ok(())
}
