//! Live presence board.
//!
//! Polls the collection versions and reprints the board when personnel or
//! activities change, whichever process made the write.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeZone;

use bt_db::{ChangeWatcher, Collection, Database};

use super::personnel::{load_roster, write_roster};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Stop after this many polls instead of running until interrupted.
    #[arg(long)]
    pub iterations: Option<u64>,
}

pub fn run<W, Tz>(
    writer: &mut W,
    db: &Database,
    args: &Args,
    interval: Duration,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut watcher = db.watch().context("failed to read collection versions")?;
    write_roster(writer, &load_roster(db)?, tz)?;
    writer.flush()?;

    let mut polls = 0;
    while args.iterations.is_none_or(|limit| polls < limit) {
        std::thread::sleep(interval);
        poll_once(writer, db, &mut watcher, tz)?;
        polls += 1;
    }
    Ok(())
}

/// Reprints the board if the roster or the activity log changed since the last poll.
///
/// Returns whether anything was printed.
pub fn poll_once<W, Tz>(
    writer: &mut W,
    db: &Database,
    watcher: &mut ChangeWatcher,
    tz: &Tz,
) -> Result<bool>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let changed = watcher
        .poll(db)
        .context("failed to read collection versions")?;
    let relevant: Vec<&str> = changed
        .iter()
        .filter(|c| matches!(c, Collection::Personnel | Collection::Activities))
        .map(Collection::as_str)
        .collect();
    if relevant.is_empty() {
        return Ok(false);
    }

    tracing::debug!(changed = ?relevant, "presence board refreshed");
    writeln!(writer)?;
    writeln!(writer, "-- changed: {}", relevant.join(", "))?;
    write_roster(writer, &load_roster(db)?, tz)?;
    writer.flush()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::{Email, MembershipInput, MembershipStatus, Role, Session};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn poll_reprints_after_clock_event_from_another_connection() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bt.db");
        let mut writer_db = Database::open(&path).unwrap();
        let person = writer_db
            .add_person("Ahmet Kaya", &Email::new("ahmet@example.com").unwrap(), Role::Employee)
            .unwrap();

        let reader = Database::open(&path).unwrap();
        let mut watcher = reader.watch().unwrap();
        let mut output = Vec::new();
        assert!(!poll_once(&mut output, &reader, &mut watcher, &Utc).unwrap());

        writer_db.clock_in(Some(&Session::for_person(&person))).unwrap();
        assert!(poll_once(&mut output, &reader, &mut watcher, &Utc).unwrap());

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("\n-- changed: activities\nNAME"), "{output}");
        assert!(output.contains("present  ENTRY "), "{output}");
    }

    #[test]
    fn membership_changes_do_not_refresh_the_board() {
        let mut db = Database::open_in_memory().unwrap();
        let mut watcher = db.watch().unwrap();
        db.add_member(
            MembershipInput {
                member_code: "MEM001".to_string(),
                name: "Ali Veli".to_string(),
                email: Email::new("ali@example.com").unwrap(),
                status: MembershipStatus::Active,
            },
            NaiveDate::from_ymd_opt(2024, 7, 28).unwrap(),
        )
        .unwrap();

        let mut output = Vec::new();
        assert!(!poll_once(&mut output, &db, &mut watcher, &Utc).unwrap());
        assert!(output.is_empty());
    }

    #[test]
    fn bounded_run_prints_initial_board() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &db,
            &Args {
                iterations: Some(2),
            },
            Duration::ZERO,
            &Utc,
        )
        .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No personnel registered.\n");
    }
}
