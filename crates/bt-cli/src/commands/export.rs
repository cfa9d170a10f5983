//! CSV export of the filtered activity log.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};

use bt_core::{export_csv, export_file_name};
use bt_db::Database;

use super::activity::FilterArgs;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output file. Defaults to `activities_<timestamp>.csv` in the export directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Writes the filtered log to a CSV file and returns its path.
///
/// `now` names the file when no output path is given.
pub fn run<W, Tz>(
    writer: &mut W,
    db: &Database,
    args: &Args,
    export_dir: &Path,
    now: &DateTime<Tz>,
) -> Result<PathBuf>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    let events = args.filter.apply(db, &tz)?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| export_dir.join(export_file_name(now)));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut file = BufWriter::new(file);
    export_csv(&mut file, &events, &tz).context("failed to write CSV")?;
    file.flush()?;

    tracing::debug!(path = %path.display(), rows = events.len(), "export written");
    writeln!(writer, "Exported {} activities to {}", events.len(), path.display())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::{ActivityKind, Email, NewActivity};
    use chrono::{FixedOffset, Utc};
    use insta::assert_snapshot;

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let email = Email::new("ahmet@example.com").unwrap();
        for (description, kind, timestamp) in [
            ("Ahmet Kaya clocked in.", ActivityKind::Entry, "2024-07-28T06:00:00Z"),
            (r#"He said "hi""#, ActivityKind::Exit, "2024-07-28T14:00:00Z"),
        ] {
            db.append_activity_at(
                NewActivity {
                    actor_email: email.clone(),
                    actor_name: "Ahmet Kaya".to_string(),
                    description: description.to_string(),
                    kind,
                },
                DateTime::parse_from_rfc3339(timestamp)
                    .unwrap()
                    .with_timezone(&Utc),
            )
            .unwrap();
        }
        db
    }

    #[test]
    fn writes_timestamped_file_in_export_dir() {
        let db = seeded();
        let temp = tempfile::tempdir().unwrap();
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = istanbul.with_ymd_and_hms(2024, 7, 28, 18, 5, 9).unwrap();
        let args = Args {
            filter: FilterArgs::default(),
            output: None,
        };

        let mut output = Vec::new();
        let path = run(&mut output, &db, &args, temp.path(), &now).unwrap();
        assert_eq!(path, temp.path().join("activities_20240728180509.csv"));

        let message = String::from_utf8(output).unwrap();
        assert!(message.starts_with("Exported 2 activities to "), "{message}");

        assert_snapshot!(std::fs::read_to_string(&path).unwrap(), @r#"
        Timestamp,Employee Name,Employee Email,Description,Event Type,Status,Duration
        "2024-07-28 17:00:00","Ahmet Kaya","ahmet@example.com","He said ""hi""","EXIT","",""
        "2024-07-28 09:00:00","Ahmet Kaya","ahmet@example.com","Ahmet Kaya clocked in.","ENTRY","",""
        "#);
    }

    #[test]
    fn explicit_output_path_and_filters_are_honored() {
        let db = seeded();
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("nested").join("out.csv");
        let args = Args {
            filter: FilterArgs {
                search: "clocked".to_string(),
                ..FilterArgs::default()
            },
            output: Some(target.clone()),
        };
        let now = Utc.with_ymd_and_hms(2024, 7, 28, 18, 0, 0).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &args, temp.path(), &now).unwrap();

        let csv = std::fs::read_to_string(&target).unwrap();
        assert_eq!(csv.lines().count(), 2, "{csv}");
        assert!(csv.contains("\"ENTRY\""));
    }
}
