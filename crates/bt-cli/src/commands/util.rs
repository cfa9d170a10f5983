//! Shared utilities for CLI commands.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use bt_core::{Email, Session};
use bt_db::Database;

/// Timestamp layout of human-readable tables.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders a UTC instant in `tz` for display.
pub fn format_local<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

/// Builds the session for `actor`.
///
/// No actor, or an email nobody is registered under, means no session.
pub fn resolve_session(db: &Database, actor: Option<&str>) -> Result<Option<Session>> {
    let Some(actor) = actor else {
        return Ok(None);
    };
    let email = Email::new(actor).with_context(|| format!("invalid --as email: {actor}"))?;
    let person = db
        .find_person_by_email(&email)
        .context("failed to look up session person")?;

    if person.is_none() {
        tracing::warn!(
            %email,
            "no registered person with this email; continuing without a session"
        );
    }
    Ok(person.as_ref().map(Session::for_person))
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).context("failed to encode JSON")?;
    writeln!(writer)?;
    Ok(())
}

/// Truncates by characters, not bytes, to avoid panics on multi-byte UTF-8.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
