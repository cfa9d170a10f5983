//! Membership commands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Subcommand;

use bt_core::{Email, MemberId, Membership, MembershipInput, MembershipStatus, search_members};
use bt_db::Database;

use super::util::{truncate, write_json};

#[derive(Debug, Subcommand)]
pub enum Action {
    /// List memberships.
    List {
        /// Only members whose name, code or email contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a membership joining today.
    Add {
        /// Unique member code, e.g. MEM006.
        #[arg(long)]
        code: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Email,

        /// active, inactive or expired.
        #[arg(long, default_value = "active")]
        status: MembershipStatus,
    },

    /// Change fields of a membership. Omitted fields keep their value.
    Update {
        /// Membership id as shown by `bt members list`.
        id: String,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<Email>,

        #[arg(long)]
        status: Option<MembershipStatus>,
    },
}

pub fn run<W: Write>(writer: &mut W, db: &mut Database, action: &Action) -> Result<()> {
    run_on(writer, db, action, Local::now().date_naive())
}

/// Like [`run`], with `today` as the join date of new members.
pub fn run_on<W: Write>(
    writer: &mut W,
    db: &mut Database,
    action: &Action,
    today: NaiveDate,
) -> Result<()> {
    match action {
        Action::List { search, json } => {
            let members = db.list_members().context("failed to read memberships")?;
            let shown = search_members(&members, search.as_deref().unwrap_or(""));
            if *json {
                write_json(writer, &shown)
            } else {
                write_members(writer, &shown)
            }
        }
        Action::Add {
            code,
            name,
            email,
            status,
        } => {
            let input = MembershipInput {
                member_code: code.clone(),
                name: name.clone(),
                email: email.clone(),
                status: *status,
            };
            let member = db
                .add_member(input, today)
                .context("failed to add membership")?;
            writeln!(
                writer,
                "Added member {} {} ({})",
                member.member_code, member.name, member.id
            )?;
            Ok(())
        }
        Action::Update {
            id,
            code,
            name,
            email,
            status,
        } => {
            let id = MemberId::new(id.as_str())?;
            let members = db.list_members().context("failed to read memberships")?;
            let Some(current) = members.into_iter().find(|m| m.id == id) else {
                bail!("membership not found: {id}");
            };
            let input = MembershipInput {
                member_code: code.clone().unwrap_or(current.member_code),
                name: name.clone().unwrap_or(current.name),
                email: email.clone().unwrap_or(current.email),
                status: status.unwrap_or(current.status),
            };
            let member = db
                .update_member(&id, input)
                .with_context(|| format!("failed to update membership {id}"))?;
            writeln!(
                writer,
                "Updated member {} {} ({})",
                member.member_code, member.name, member.status
            )?;
            Ok(())
        }
    }
}

fn write_members<W: Write>(writer: &mut W, members: &[&Membership]) -> Result<()> {
    if members.is_empty() {
        writeln!(writer, "No memberships found.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<8}  {:<20}  {:<26}  {:<8}  {:<10}  {:<10}  ID",
        "CODE", "NAME", "EMAIL", "STATUS", "JOINED", "LAST VISIT"
    )?;
    for member in members {
        writeln!(
            writer,
            "{:<8}  {:<20}  {:<26}  {:<8}  {:<10}  {:<10}  {}",
            member.member_code,
            truncate(&member.name, 20),
            truncate(member.email.as_str(), 26),
            member.status.as_str(),
            member.joined_on.to_string(),
            member.last_visit.to_string(),
            member.id
        )?;
    }
    Ok(())
}
