//! Activity events recorded by or on behalf of personnel.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event_type::EventType;
use crate::leave::LeaveStatus;
use crate::types::{ActivityId, Email, ValidationError};

/// An immutable, timestamped record of an action.
///
/// The only field that ever changes after append is the status of a
/// [`ActivityKind::LeaveRequest`], and only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Store-assigned identifier.
    pub id: ActivityId,
    /// Store-assigned insertion sequence. Breaks ties between equal timestamps.
    pub seq: i64,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Email of the person the event belongs to.
    pub actor_email: Email,
    /// Display name of that person at the time of the event.
    pub actor_name: String,
    /// Free-text description shown in the activity log.
    pub description: String,
    /// Type-specific payload.
    pub kind: ActivityKind,
}

/// Type-specific payload of an activity event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// Clock-in.
    Entry,
    /// Clock-out.
    Exit,
    /// A unit of work.
    Task {
        status: TaskStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
    },
    /// A leave request awaiting or past its single resolution.
    LeaveRequest {
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
        status: LeaveStatus,
    },
}

impl ActivityKind {
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Entry => EventType::Entry,
            Self::Exit => EventType::Exit,
            Self::Task { .. } => EventType::Task,
            Self::LeaveRequest { .. } => EventType::LeaveRequest,
        }
    }
}

impl ActivityEvent {
    pub const fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Status label for tasks and leave requests, `None` for clock events.
    pub const fn status_label(&self) -> Option<&'static str> {
        match &self.kind {
            ActivityKind::Task { status, .. } => Some(status.as_str()),
            ActivityKind::LeaveRequest { status, .. } => Some(status.as_str()),
            ActivityKind::Entry | ActivityKind::Exit => None,
        }
    }

    pub fn duration(&self) -> Option<&str> {
        match &self.kind {
            ActivityKind::Task { duration, .. } => duration.as_deref(),
            _ => None,
        }
    }
}

/// Ordering used for every "most recent first" view.
///
/// Later timestamps come first; equal timestamps are ordered by descending
/// insertion sequence, so the event appended last wins.
pub fn newest_first(a: &ActivityEvent, b: &ActivityEvent) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.seq.cmp(&a.seq))
}

/// An activity before the store has assigned its id, sequence and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub actor_email: Email,
    pub actor_name: String,
    pub description: String,
    pub kind: ActivityKind,
}

/// Progress of a task activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Started,
    InProgress,
    Completed,
    Pending,
}

impl TaskStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(Self::Started),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            _ => Err(ValidationError::InvalidTaskStatus {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(seq: i64, timestamp: &str, kind: ActivityKind) -> ActivityEvent {
        ActivityEvent {
            id: ActivityId::new(format!("ea{seq}")).unwrap(),
            seq,
            timestamp: DateTime::parse_from_rfc3339(timestamp)
                .unwrap()
                .with_timezone(&Utc),
            actor_email: Email::new("ahmet@example.com").unwrap(),
            actor_name: "Ahmet Kaya".to_string(),
            description: "Sabah kontrolü".to_string(),
            kind,
        }
    }

    #[test]
    fn kind_serializes_with_screaming_type_tag() {
        let kind = ActivityKind::Task {
            status: TaskStatus::InProgress,
            duration: Some("15dk".to_string()),
        };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(
            json,
            r#"{"type":"TASK","status":"in_progress","duration":"15dk"}"#
        );

        let entry: ActivityKind = serde_json::from_str(r#"{"type":"ENTRY"}"#).unwrap();
        assert_eq!(entry, ActivityKind::Entry);
    }

    #[test]
    fn leave_kind_parses_dates() {
        let kind: ActivityKind = serde_json::from_str(
            r#"{"type":"LEAVE_REQUEST","start_date":"2024-08-01","end_date":"2024-08-03","reason":"Family visit abroad","status":"pending"}"#,
        )
        .unwrap();
        assert_eq!(kind.event_type(), EventType::LeaveRequest);
    }

    #[test]
    fn status_and_duration_only_for_relevant_kinds() {
        let entry = event(1, "2024-07-28T09:00:00Z", ActivityKind::Entry);
        assert_eq!(entry.status_label(), None);
        assert_eq!(entry.duration(), None);

        let task = event(
            2,
            "2024-07-28T09:00:00Z",
            ActivityKind::Task {
                status: TaskStatus::Completed,
                duration: Some("10dk".to_string()),
            },
        );
        assert_eq!(task.status_label(), Some("completed"));
        assert_eq!(task.duration(), Some("10dk"));
    }

    #[test]
    fn newest_first_breaks_ties_by_sequence() {
        let early = event(1, "2024-07-28T09:00:00Z", ActivityKind::Entry);
        let tie_a = event(2, "2024-07-28T17:00:00Z", ActivityKind::Entry);
        let tie_b = event(3, "2024-07-28T17:00:00Z", ActivityKind::Exit);

        let mut events = vec![early, tie_a, tie_b];
        events.sort_by(newest_first);

        let seqs: Vec<i64> = events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![3, 2, 1]);
    }

    #[test]
    fn task_status_rejects_unknown() {
        assert_eq!(
            "in_progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("done".parse::<TaskStatus>().is_err());
    }
}
