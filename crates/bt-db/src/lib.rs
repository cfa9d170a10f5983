//! Storage layer for BizTrack.
//!
//! Provides the personnel, activity and membership stores using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Separate processes may open the same file; writes are last-writer-wins and
//! readers learn about them through [`ChangeWatcher`].
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in ISO 8601 format with millisecond precision
//! (e.g., `2024-07-28T09:00:00.000Z`), so lexicographic ordering matches
//! chronological ordering.
//!
//! ## Activity Payload Storage
//!
//! The `type` column stores the event type (`ENTRY`, `TASK`, ...) and the `data`
//! column the JSON-encoded [`ActivityKind`]. The `seq` column is the insertion
//! sequence used to order events that share a timestamp.
//!
//! ## Change Versions
//!
//! Every write bumps the counter of its collection in `collection_versions`
//! inside the same transaction.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use thiserror::Error;
use uuid::Uuid;

use bt_core::{
    ActivityEvent, ActivityId, ActivityKind, AuthError, Email, EventType, LeaveDraft, LeaveError,
    LeaveRequest, LeaveStatus, MemberId, Membership, MembershipInput, NewActivity, Person,
    PersonId, Role, Session, TaskStatus, ValidationError, apply_leave_status, leave_requests,
    require_session, validate_name,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The email is already registered to someone.
    #[error("email already registered: {0}")]
    DuplicateEmail(Email),
    /// The membership code is already in use.
    #[error("member code already in use: {0}")]
    DuplicateMemberCode(String),
    /// No record with the given id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Missing or insufficient session.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Refused leave status transition.
    #[error(transparent)]
    Leave(#[from] LeaveError),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored record could not be decoded.
    #[error("invalid record {record_id}: {message}")]
    InvalidRecord { record_id: String, message: String },
}

/// A collection whose writes are announced through [`ChangeWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Personnel,
    Activities,
    Memberships,
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::Personnel, Self::Activities, Self::Memberships];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Personnel => "personnel",
            Self::Activities => "activities",
            Self::Memberships => "memberships",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS personnel (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Activities table: append-only log of activity events
            -- seq: insertion order, tie-break for equal timestamps
            -- type: event type (e.g., 'ENTRY', 'LEAVE_REQUEST')
            -- data: JSON payload with the type-specific fields
            CREATE TABLE IF NOT EXISTS activities (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                timestamp TEXT NOT NULL,
                actor_email TEXT NOT NULL,
                actor_name TEXT NOT NULL,
                description TEXT NOT NULL,
                type TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activities_timestamp ON activities(timestamp);
            CREATE INDEX IF NOT EXISTS idx_activities_actor ON activities(actor_email);
            CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(type);

            CREATE TABLE IF NOT EXISTS memberships (
                id TEXT PRIMARY KEY,
                member_code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                status TEXT NOT NULL,
                joined_on TEXT NOT NULL,
                last_visit TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS collection_versions (
                collection TEXT PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 0
            );

            INSERT OR IGNORE INTO collection_versions (collection, version) VALUES
                ('personnel', 0),
                ('activities', 0),
                ('memberships', 0);
            ",
        )?;
        Ok(())
    }

    // ========== Personnel Store ==========

    /// Lists registered people in registration order.
    ///
    /// Rows that fail to decode are logged and skipped.
    pub fn list_people(&self) -> Result<Vec<Person>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, role FROM personnel ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], PersonRow::from_row)?;
        let mut people = Vec::new();
        for row in rows {
            match row?.into_person() {
                Ok(person) => people.push(person),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable personnel row"),
            }
        }
        Ok(people)
    }

    /// Looks a person up by email.
    pub fn find_person_by_email(&self, email: &Email) -> Result<Option<Person>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, email, role FROM personnel WHERE email = ?",
                [email.as_str()],
                PersonRow::from_row,
            )
            .optional()?;
        row.map(PersonRow::into_person).transpose()
    }

    /// Registers a person. Fails without changes if the email is taken.
    pub fn add_person(&mut self, name: &str, email: &Email, role: Role) -> Result<Person, DbError> {
        let name = validate_name(name)?;
        if self.find_person_by_email(email)?.is_some() {
            return Err(DbError::DuplicateEmail(email.clone()));
        }

        let person = Person {
            id: PersonId::new(format!("p-{}", Uuid::new_v4()))?,
            name,
            email: email.clone(),
            role,
        };

        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            "INSERT INTO personnel (id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                person.id.as_str(),
                person.name,
                person.email.as_str(),
                person.role.as_str(),
                format_timestamp(Utc::now()),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::DuplicateEmail(email.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        bump_version(&tx, Collection::Personnel)?;
        tx.commit()?;

        tracing::debug!(id = %person.id, email = %person.email, "person registered");
        Ok(person)
    }

    /// Removes a person. Their activity history stays in the log.
    pub fn remove_person(&mut self, id: &PersonId) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM personnel WHERE id = ?", [id.as_str()])?;
        if removed == 0 {
            return Err(DbError::NotFound {
                kind: "person",
                id: id.to_string(),
            });
        }
        bump_version(&tx, Collection::Personnel)?;
        tx.commit()?;

        tracing::debug!(%id, "person removed");
        Ok(())
    }

    // ========== Activity Store ==========

    /// Lists activities in insertion order, optionally for a single actor.
    ///
    /// Rows that fail to decode are logged and skipped.
    pub fn list_activities(&self, actor: Option<&Email>) -> Result<Vec<ActivityEvent>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT seq, id, timestamp, actor_email, actor_name, description, data
            FROM activities
            WHERE ?1 IS NULL OR actor_email = ?1
            ORDER BY seq ASC
            ",
        )?;
        let rows = stmt.query_map([actor.map(Email::as_str)], ActivityRow::from_row)?;
        collect_activities(rows)
    }

    fn list_activities_of_type(
        &self,
        event_type: EventType,
    ) -> Result<Vec<ActivityEvent>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT seq, id, timestamp, actor_email, actor_name, description, data
            FROM activities
            WHERE type = ?
            ORDER BY seq ASC
            ",
        )?;
        let rows = stmt.query_map([event_type.to_string()], ActivityRow::from_row)?;
        collect_activities(rows)
    }

    /// Appends an activity stamped with the current time.
    pub fn append_activity(&mut self, activity: NewActivity) -> Result<ActivityEvent, DbError> {
        self.append_activity_at(activity, Utc::now())
    }

    /// Appends an activity with an explicit timestamp.
    ///
    /// The store assigns the id and insertion sequence. The timestamp is
    /// truncated to the stored millisecond precision.
    pub fn append_activity_at(
        &mut self,
        activity: NewActivity,
        timestamp: DateTime<Utc>,
    ) -> Result<ActivityEvent, DbError> {
        let id = ActivityId::new(format!("ea-{}", Uuid::new_v4()))?;
        let timestamp = timestamp.trunc_subsecs(3);
        let data = encode_kind(&activity.kind, id.as_str())?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT INTO activities (id, timestamp, actor_email, actor_name, description, type, data)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id.as_str(),
                format_timestamp(timestamp),
                activity.actor_email.as_str(),
                activity.actor_name,
                activity.description,
                activity.kind.event_type().to_string(),
                data,
            ],
        )?;
        let seq = tx.last_insert_rowid();
        bump_version(&tx, Collection::Activities)?;
        tx.commit()?;

        let event = ActivityEvent {
            id,
            seq,
            timestamp,
            actor_email: activity.actor_email,
            actor_name: activity.actor_name,
            description: activity.description,
            kind: activity.kind,
        };
        tracing::debug!(
            id = %event.id,
            event_type = %event.event_type(),
            actor = %event.actor_email,
            "activity appended"
        );
        Ok(event)
    }

    /// Moves a leave request to `status`, returning `None` for unknown ids.
    ///
    /// The transition rules of [`LeaveStatus::transition`] apply; a refused
    /// transition leaves the record untouched.
    pub fn set_leave_status(
        &mut self,
        id: &ActivityId,
        status: LeaveStatus,
    ) -> Result<Option<ActivityEvent>, DbError> {
        let tx = self.conn.transaction()?;
        let row = tx
            .query_row(
                "
                SELECT seq, id, timestamp, actor_email, actor_name, description, data
                FROM activities
                WHERE id = ?
                ",
                [id.as_str()],
                ActivityRow::from_row,
            )
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut event = row.into_event()?;
        apply_leave_status(&mut event, status)?;
        tx.execute(
            "UPDATE activities SET data = ? WHERE id = ?",
            params![encode_kind(&event.kind, id.as_str())?, id.as_str()],
        )?;
        bump_version(&tx, Collection::Activities)?;
        tx.commit()?;

        tracing::debug!(%id, %status, "leave status updated");
        Ok(Some(event))
    }

    // ========== Workflows ==========

    /// Records a clock-in for the session's person.
    pub fn clock_in(&mut self, session: Option<&Session>) -> Result<ActivityEvent, DbError> {
        self.clock(session, ActivityKind::Entry)
    }

    /// Records a clock-out for the session's person.
    pub fn clock_out(&mut self, session: Option<&Session>) -> Result<ActivityEvent, DbError> {
        self.clock(session, ActivityKind::Exit)
    }

    fn clock(
        &mut self,
        session: Option<&Session>,
        kind: ActivityKind,
    ) -> Result<ActivityEvent, DbError> {
        let session = require_session(session)?;
        let verb = if kind == ActivityKind::Entry {
            "clocked in"
        } else {
            "clocked out"
        };
        self.append_activity(NewActivity {
            actor_email: session.email.clone(),
            actor_name: session.name.clone(),
            description: format!("{} {verb}.", session.name),
            kind,
        })
    }

    /// Records a task for the session's person.
    pub fn record_task(
        &mut self,
        session: Option<&Session>,
        description: &str,
        status: TaskStatus,
        duration: Option<String>,
    ) -> Result<ActivityEvent, DbError> {
        let session = require_session(session)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            }
            .into());
        }
        let duration = duration
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.append_activity(NewActivity {
            actor_email: session.email.clone(),
            actor_name: session.name.clone(),
            description: description.to_string(),
            kind: ActivityKind::Task { status, duration },
        })
    }

    /// Submits a pending leave request owned by the session's person.
    pub fn submit_leave_request(
        &mut self,
        session: Option<&Session>,
        draft: LeaveDraft,
    ) -> Result<LeaveRequest, DbError> {
        let session = require_session(session)?;
        let activity = draft.into_activity(session)?;
        let event = self.append_activity(activity)?;
        LeaveRequest::from_activity(&event).ok_or_else(|| DbError::InvalidRecord {
            record_id: event.id.to_string(),
            message: "stored leave request lost its payload".to_string(),
        })
    }

    /// Approves or rejects a pending leave request. Admins only.
    pub fn resolve_leave_request(
        &mut self,
        session: Option<&Session>,
        id: &ActivityId,
        decision: LeaveStatus,
    ) -> Result<LeaveRequest, DbError> {
        require_session(session)?.require_admin()?;
        let event = self
            .set_leave_status(id, decision)?
            .ok_or_else(|| DbError::NotFound {
                kind: "leave request",
                id: id.to_string(),
            })?;
        LeaveRequest::from_activity(&event).ok_or_else(|| DbError::NotFound {
            kind: "leave request",
            id: id.to_string(),
        })
    }

    /// Lists leave requests, newest submission first.
    pub fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>, DbError> {
        let events = self.list_activities_of_type(EventType::LeaveRequest)?;
        Ok(leave_requests(&events))
    }

    // ========== Membership Store ==========

    /// Lists memberships ordered by member code.
    pub fn list_members(&self) -> Result<Vec<Membership>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, member_code, name, email, status, joined_on, last_visit
            FROM memberships
            ORDER BY member_code ASC
            ",
        )?;
        let rows = stmt.query_map([], MemberRow::from_row)?;
        let mut members = Vec::new();
        for row in rows {
            match row?.into_member() {
                Ok(member) => members.push(member),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable membership row"),
            }
        }
        Ok(members)
    }

    /// Adds a membership joining on `today`.
    pub fn add_member(
        &mut self,
        input: MembershipInput,
        today: NaiveDate,
    ) -> Result<Membership, DbError> {
        let input = input.validated()?;
        let member = Membership {
            id: MemberId::new(format!("mem-{}", Uuid::new_v4()))?,
            member_code: input.member_code,
            name: input.name,
            email: input.email,
            status: input.status,
            joined_on: today,
            last_visit: today,
        };

        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            "
            INSERT INTO memberships (id, member_code, name, email, status, joined_on, last_visit)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                member.id.as_str(),
                member.member_code,
                member.name,
                member.email.as_str(),
                member.status.as_str(),
                member.joined_on.to_string(),
                member.last_visit.to_string(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::DuplicateMemberCode(member.member_code));
            }
            Err(e) => return Err(e.into()),
        }
        bump_version(&tx, Collection::Memberships)?;
        tx.commit()?;

        tracing::debug!(id = %member.id, code = %member.member_code, "membership added");
        Ok(member)
    }

    /// Replaces the editable fields of a membership, keeping its dates.
    pub fn update_member(
        &mut self,
        id: &MemberId,
        input: MembershipInput,
    ) -> Result<Membership, DbError> {
        let input = input.validated()?;
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE memberships SET member_code = ?, name = ?, email = ?, status = ? WHERE id = ?",
            params![
                input.member_code,
                input.name,
                input.email.as_str(),
                input.status.as_str(),
                id.as_str(),
            ],
        );
        match updated {
            Ok(0) => {
                return Err(DbError::NotFound {
                    kind: "membership",
                    id: id.to_string(),
                });
            }
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::DuplicateMemberCode(input.member_code));
            }
            Err(e) => return Err(e.into()),
        }
        let row = tx.query_row(
            "
            SELECT id, member_code, name, email, status, joined_on, last_visit
            FROM memberships
            WHERE id = ?
            ",
            [id.as_str()],
            MemberRow::from_row,
        )?;
        bump_version(&tx, Collection::Memberships)?;
        tx.commit()?;

        tracing::debug!(%id, "membership updated");
        row.into_member()
    }

    // ========== Change Notification ==========

    /// Current version counter of every collection.
    pub fn collection_versions(&self) -> Result<HashMap<Collection, i64>, DbError> {
        let mut versions = HashMap::new();
        for collection in Collection::ALL {
            let version: i64 = self.conn.query_row(
                "SELECT version FROM collection_versions WHERE collection = ?",
                [collection.as_str()],
                |row| row.get(0),
            )?;
            versions.insert(collection, version);
        }
        Ok(versions)
    }

    /// Starts watching for writes made after this call.
    pub fn watch(&self) -> Result<ChangeWatcher, DbError> {
        Ok(ChangeWatcher {
            seen: self.collection_versions()?,
        })
    }
}

/// Detects writes to collections by comparing version counters.
///
/// Carries no payload: on change, re-read the collection.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    seen: HashMap<Collection, i64>,
}

impl ChangeWatcher {
    /// Collections written since the previous poll (or since creation).
    pub fn poll(&mut self, db: &Database) -> Result<Vec<Collection>, DbError> {
        let current = db.collection_versions()?;
        let mut changed: Vec<Collection> = current
            .iter()
            .filter(|(collection, version)| self.seen.get(collection) != Some(version))
            .map(|(collection, _)| *collection)
            .collect();
        changed.sort();
        self.seen = current;
        Ok(changed)
    }
}

// ========== Row decoding ==========

struct PersonRow {
    id: String,
    name: String,
    email: String,
    role: String,
}

impl PersonRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: row.get(3)?,
        })
    }

    fn into_person(self) -> Result<Person, DbError> {
        let invalid = |e: ValidationError| DbError::InvalidRecord {
            record_id: self.id.clone(),
            message: e.to_string(),
        };
        Ok(Person {
            id: PersonId::new(self.id.clone()).map_err(invalid)?,
            email: Email::new(&self.email).map_err(invalid)?,
            role: self.role.parse().map_err(invalid)?,
            name: self.name,
        })
    }
}

struct ActivityRow {
    seq: i64,
    id: String,
    timestamp: String,
    actor_email: String,
    actor_name: String,
    description: String,
    data: String,
}

impl ActivityRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            id: row.get(1)?,
            timestamp: row.get(2)?,
            actor_email: row.get(3)?,
            actor_name: row.get(4)?,
            description: row.get(5)?,
            data: row.get(6)?,
        })
    }

    fn into_event(self) -> Result<ActivityEvent, DbError> {
        let invalid = |message: String| DbError::InvalidRecord {
            record_id: self.id.clone(),
            message,
        };
        let kind: ActivityKind =
            serde_json::from_str(&self.data).map_err(|e| invalid(e.to_string()))?;
        Ok(ActivityEvent {
            id: ActivityId::new(self.id.clone()).map_err(|e| invalid(e.to_string()))?,
            seq: self.seq,
            timestamp: parse_timestamp(&self.timestamp, &self.id)?,
            actor_email: Email::new(&self.actor_email).map_err(|e| invalid(e.to_string()))?,
            actor_name: self.actor_name,
            description: self.description,
            kind,
        })
    }
}

struct MemberRow {
    id: String,
    member_code: String,
    name: String,
    email: String,
    status: String,
    joined_on: String,
    last_visit: String,
}

impl MemberRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            member_code: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            status: row.get(4)?,
            joined_on: row.get(5)?,
            last_visit: row.get(6)?,
        })
    }

    fn into_member(self) -> Result<Membership, DbError> {
        let invalid = |message: String| DbError::InvalidRecord {
            record_id: self.id.clone(),
            message,
        };
        let date = |value: &str| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))
        };
        Ok(Membership {
            id: MemberId::new(self.id.clone()).map_err(|e| invalid(e.to_string()))?,
            email: Email::new(&self.email).map_err(|e| invalid(e.to_string()))?,
            status: self.status.parse().map_err(|e: ValidationError| invalid(e.to_string()))?,
            joined_on: date(&self.joined_on)?,
            last_visit: date(&self.last_visit)?,
            member_code: self.member_code,
            name: self.name,
        })
    }
}

fn collect_activities(
    rows: impl Iterator<Item = rusqlite::Result<ActivityRow>>,
) -> Result<Vec<ActivityEvent>, DbError> {
    let mut events = Vec::new();
    for row in rows {
        match row?.into_event() {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable activity row"),
        }
    }
    Ok(events)
}

fn encode_kind(kind: &ActivityKind, record_id: &str) -> Result<String, DbError> {
    serde_json::to_string(kind).map_err(|e| DbError::InvalidRecord {
        record_id: record_id.to_string(),
        message: e.to_string(),
    })
}

fn bump_version(tx: &Transaction<'_>, collection: Collection) -> Result<(), DbError> {
    tx.execute(
        "UPDATE collection_versions SET version = version + 1 WHERE collection = ?",
        [collection.as_str()],
    )?;
    Ok(())
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
