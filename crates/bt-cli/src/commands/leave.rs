//! Leave request commands.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use clap::Subcommand;

use bt_core::{ActivityId, LeaveDraft, LeaveRequest, LeaveStatus, Session};
use bt_db::Database;

use super::util::{format_local, truncate, write_json};

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Submit a leave request for yourself.
    Request {
        /// First day of leave (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// Last day of leave (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Why; between 10 and 500 characters.
        #[arg(long)]
        reason: String,
    },

    /// List leave requests, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Approve a pending request. Requires an admin session.
    Approve { id: String },

    /// Reject a pending request. Requires an admin session.
    Reject { id: String },
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
        Action::Request { start, end, reason } => {
            let draft = LeaveDraft {
                start_date: *start,
                end_date: *end,
                reason: reason.clone(),
            };
            let request = db
                .submit_leave_request(session, draft)
                .context("failed to submit leave request")?;
            writeln!(
                writer,
                "Submitted leave request {} for {} to {} (pending)",
                request.id, request.start_date, request.end_date
            )?;
            Ok(())
        }
        Action::List { json } => {
            let requests = db
                .list_leave_requests()
                .context("failed to read leave requests")?;
            if *json {
                write_json(writer, &requests)
            } else {
                write_requests(writer, &requests, tz)
            }
        }
        Action::Approve { id } => resolve(writer, db, session, id, LeaveStatus::Approved),
        Action::Reject { id } => resolve(writer, db, session, id, LeaveStatus::Rejected),
    }
}

fn resolve<W: Write>(
    writer: &mut W,
    db: &mut Database,
    session: Option<&Session>,
    id: &str,
    decision: LeaveStatus,
) -> Result<()> {
    let id = ActivityId::new(id)?;
    let request = db
        .resolve_leave_request(session, &id, decision)
        .with_context(|| format!("failed to resolve leave request {id}"))?;
    writeln!(
        writer,
        "Leave request {} from {} is now {}",
        request.id, request.actor_name, request.status
    )?;
    Ok(())
}

fn write_requests<W, Tz>(writer: &mut W, requests: &[LeaveRequest], tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if requests.is_empty() {
        writeln!(writer, "No leave requests.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<16}  {:<18}  {:<10}  {:<10}  {:<8}  {:<30}  ID",
        "SUBMITTED", "EMPLOYEE", "START", "END", "STATUS", "REASON"
    )?;
    for request in requests {
        writeln!(
            writer,
            "{:<16}  {:<18}  {:<10}  {:<10}  {:<8}  {:<30}  {}",
            format_local(&request.submitted_at, tz),
            truncate(&request.actor_name, 18),
            request.start_date.to_string(),
            request.end_date.to_string(),
            request.status.as_str(),
            truncate(&request.reason, 30),
            request.id
        )?;
    }
    Ok(())
}
