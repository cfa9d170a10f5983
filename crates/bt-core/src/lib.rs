//! Core domain logic for BizTrack.
//!
//! This crate contains the fundamental types and logic for:
//! - Presence: deriving who is in or out from clock events
//! - Activity log views: filtering, ordering and CSV export
//! - Leave requests: the pending → approved/rejected lifecycle
//! - Sessions: the explicit actor context used for authorization

pub mod activity;
pub mod event_type;
pub mod export;
pub mod filter;
pub mod leave;
pub mod membership;
pub mod person;
pub mod presence;
pub mod session;
pub mod types;

pub use activity::{ActivityEvent, ActivityKind, NewActivity, TaskStatus, newest_first};
pub use event_type::{EventType, UnknownEventType};
pub use export::{ExportError, export_csv, export_file_name};
pub use filter::{ActivityFilter, ActorFilter, filter_activities};
pub use leave::{
    LeaveDraft, LeaveError, LeaveRequest, LeaveStatus, apply_leave_status, leave_requests,
};
pub use membership::{Membership, MembershipInput, MembershipStatus, search_members};
pub use person::{Person, validate_name};
pub use presence::{Presence, PresenceStatus, RosterEntry, derive_status, roster_status};
pub use session::{AuthError, Session, require_session};
pub use types::{ActivityId, Email, MemberId, PersonId, Role, ValidationError};
