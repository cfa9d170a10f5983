//! Leave request lifecycle.
//!
//! A leave request is stored as a `LEAVE_REQUEST` activity event; the
//! [`LeaveRequest`] type is a read view over that event. Its status moves
//! exactly once, from `pending` to either `approved` or `rejected`:
//!
//! ```text
//! pending ──approve──▶ approved
//!    └─────reject────▶ rejected
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::{ActivityEvent, ActivityKind, NewActivity, newest_first};
use crate::session::Session;
use crate::types::{ActivityId, Email, ValidationError};

/// Accepted leave reason length, in characters.
pub const REASON_MIN_LEN: usize = 10;
pub const REASON_MAX_LEN: usize = 500;

/// Characters of the reason quoted in the activity description.
const DESCRIPTION_REASON_CHARS: usize = 30;

/// Errors from the leave status state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveError {
    /// The request already reached a terminal state.
    #[error("leave request is already {status}")]
    AlreadyResolved { status: LeaveStatus },

    /// Only `approved` and `rejected` are valid targets.
    #[error("leave requests cannot be moved to {target}")]
    InvalidTarget { target: LeaveStatus },

    /// The activity is not a leave request.
    #[error("activity {id} is not a leave request")]
    NotALeaveRequest { id: ActivityId },
}

/// Status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Applies the single allowed transition.
    pub fn transition(self, target: Self) -> Result<Self, LeaveError> {
        if self.is_terminal() {
            return Err(LeaveError::AlreadyResolved { status: self });
        }
        match target {
            Self::Approved | Self::Rejected => Ok(target),
            Self::Pending => Err(LeaveError::InvalidTarget { target }),
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ValidationError::InvalidLeaveStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Leave request input as typed by the employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraft {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveDraft {
    /// Validates the draft and builds the pending activity owned by `session`.
    pub fn into_activity(self, session: &Session) -> Result<NewActivity, ValidationError> {
        let reason = self.reason.trim().to_string();
        let len = reason.chars().count();
        if !(REASON_MIN_LEN..=REASON_MAX_LEN).contains(&len) {
            return Err(ValidationError::ReasonLength {
                min: REASON_MIN_LEN,
                max: REASON_MAX_LEN,
                len,
            });
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }

        Ok(NewActivity {
            actor_email: session.email.clone(),
            actor_name: session.name.clone(),
            description: leave_description(&reason),
            kind: ActivityKind::LeaveRequest {
                start_date: self.start_date,
                end_date: self.end_date,
                reason,
                status: LeaveStatus::Pending,
            },
        })
    }
}

fn leave_description(reason: &str) -> String {
    let mut chars = reason.chars();
    let head: String = chars.by_ref().take(DESCRIPTION_REASON_CHARS).collect();
    if chars.next().is_some() {
        format!("Leave request: {head}...")
    } else {
        format!("Leave request: {head}")
    }
}

/// Read view of a `LEAVE_REQUEST` activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequest {
    pub id: ActivityId,
    pub actor_email: Email,
    pub actor_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub submitted_at: DateTime<Utc>,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    pub fn from_activity(event: &ActivityEvent) -> Option<Self> {
        match &event.kind {
            ActivityKind::LeaveRequest {
                start_date,
                end_date,
                reason,
                status,
            } => Some(Self {
                id: event.id.clone(),
                actor_email: event.actor_email.clone(),
                actor_name: event.actor_name.clone(),
                start_date: *start_date,
                end_date: *end_date,
                reason: reason.clone(),
                submitted_at: event.timestamp,
                status: *status,
            }),
            _ => None,
        }
    }
}

/// All leave requests in the log, newest submission first.
pub fn leave_requests(events: &[ActivityEvent]) -> Vec<LeaveRequest> {
    let mut requests: Vec<&ActivityEvent> = events
        .iter()
        .filter(|event| matches!(event.kind, ActivityKind::LeaveRequest { .. }))
        .collect();
    requests.sort_by(|a, b| newest_first(a, b));
    requests
        .into_iter()
        .filter_map(LeaveRequest::from_activity)
        .collect()
}

/// Moves the leave request recorded by `event` to `target`.
///
/// The event is left untouched when the transition is refused.
pub fn apply_leave_status(
    event: &mut ActivityEvent,
    target: LeaveStatus,
) -> Result<(), LeaveError> {
    match &mut event.kind {
        ActivityKind::LeaveRequest { status, .. } => {
            *status = status.transition(target)?;
            Ok(())
        }
        _ => Err(LeaveError::NotALeaveRequest {
            id: event.id.clone(),
        }),
    }
}
