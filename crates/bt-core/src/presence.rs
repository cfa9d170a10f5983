//! Presence engine.
//!
//! A person's presence is never stored. It is derived on every read from the
//! latest `ENTRY`/`EXIT` event in the activity log that belongs to them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::{ActivityEvent, newest_first};
use crate::event_type::EventType;
use crate::person::Person;

/// Derived in/out state of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Latest clock event is an entry.
    Present,
    /// Latest clock event is an exit, or there is none.
    Absent,
}

impl Presence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presence together with the clock event it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceStatus {
    pub presence: Presence,
    /// `None` when the person never clocked in or out.
    pub last_event_type: Option<EventType>,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl PresenceStatus {
    const NEVER_SCANNED: Self = Self {
        presence: Presence::Absent,
        last_event_type: None,
        last_event_at: None,
    };
}

/// Derives the current presence of `person` from the full activity log.
pub fn derive_status(person: &Person, events: &[ActivityEvent]) -> PresenceStatus {
    let latest = events
        .iter()
        .filter(|event| event.actor_email == person.email && event.event_type().is_clock())
        .min_by(|a, b| newest_first(a, b));

    let Some(latest) = latest else {
        return PresenceStatus::NEVER_SCANNED;
    };

    let event_type = latest.event_type();
    let presence = if event_type == EventType::Entry {
        Presence::Present
    } else {
        Presence::Absent
    };

    PresenceStatus {
        presence,
        last_event_type: Some(event_type),
        last_event_at: Some(latest.timestamp),
    }
}

/// A roster row: the person and their derived presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub person: Person,
    #[serde(flatten)]
    pub status: PresenceStatus,
}

/// Derives presence for every person, keeping roster order.
pub fn roster_status(people: &[Person], events: &[ActivityEvent]) -> Vec<RosterEntry> {
    people
        .iter()
        .map(|person| RosterEntry {
            person: person.clone(),
            status: derive_status(person, events),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::activity::{ActivityKind, TaskStatus};
    use crate::types::{ActivityId, Email, PersonId, Role};

    fn person(name: &str, email: &str) -> Person {
        Person {
            id: PersonId::new(format!("p-{name}")).unwrap(),
            name: name.to_string(),
            email: Email::new(email).unwrap(),
            role: Role::Employee,
        }
    }

    fn event(seq: i64, email: &str, timestamp: &str, kind: ActivityKind) -> ActivityEvent {
        ActivityEvent {
            id: ActivityId::new(format!("ea{seq}")).unwrap(),
            seq,
            timestamp: DateTime::parse_from_rfc3339(timestamp)
                .unwrap()
                .with_timezone(&Utc),
            actor_email: Email::new(email).unwrap(),
            actor_name: email.to_string(),
            description: String::new(),
            kind,
        }
    }

    fn at(timestamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn no_clock_events_means_absent() {
        let ahmet = person("Ahmet", "ahmet@x.com");
        let events = vec![event(
            1,
            "ahmet@x.com",
            "2024-07-28T09:00:00Z",
            ActivityKind::Task {
                status: TaskStatus::Completed,
                duration: None,
            },
        )];

        let status = derive_status(&ahmet, &events);
        assert_eq!(status.presence, Presence::Absent);
        assert_eq!(status.last_event_type, None);
        assert_eq!(status.last_event_at, None);
    }

    #[test]
    fn entry_then_exit_is_absent() {
        let ahmet = person("Ahmet", "ahmet@x.com");
        let events = vec![
            event(1, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Entry),
            event(2, "ahmet@x.com", "2024-07-28T17:00:00Z", ActivityKind::Exit),
        ];

        let status = derive_status(&ahmet, &events);
        assert_eq!(status.presence, Presence::Absent);
        assert_eq!(status.last_event_type, Some(EventType::Exit));
        assert_eq!(status.last_event_at, Some(at("2024-07-28T17:00:00Z")));
    }

    #[test]
    fn latest_entry_is_present_regardless_of_log_order() {
        let ahmet = person("Ahmet", "ahmet@x.com");
        // Log order differs from chronological order.
        let events = vec![
            event(1, "ahmet@x.com", "2024-07-29T08:30:00Z", ActivityKind::Entry),
            event(2, "ahmet@x.com", "2024-07-28T17:00:00Z", ActivityKind::Exit),
        ];

        let status = derive_status(&ahmet, &events);
        assert_eq!(status.presence, Presence::Present);
        assert_eq!(status.last_event_type, Some(EventType::Entry));
    }

    #[test]
    fn other_people_and_non_clock_events_are_ignored() {
        let ahmet = person("Ahmet", "ahmet@x.com");
        let events = vec![
            event(1, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Entry),
            event(2, "zeynep@x.com", "2024-07-28T10:00:00Z", ActivityKind::Exit),
            event(
                3,
                "ahmet@x.com",
                "2024-07-28T11:00:00Z",
                ActivityKind::Task {
                    status: TaskStatus::Started,
                    duration: None,
                },
            ),
        ];

        let status = derive_status(&ahmet, &events);
        assert_eq!(status.presence, Presence::Present);
        assert_eq!(status.last_event_at, Some(at("2024-07-28T09:00:00Z")));
    }

    #[test]
    fn equal_timestamps_resolve_to_last_appended() {
        let ahmet = person("Ahmet", "ahmet@x.com");
        let events = vec![
            event(1, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Entry),
            event(2, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Exit),
        ];
        assert_eq!(derive_status(&ahmet, &events).presence, Presence::Absent);

        let reversed = vec![
            event(1, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Exit),
            event(2, "ahmet@x.com", "2024-07-28T09:00:00Z", ActivityKind::Entry),
        ];
        assert_eq!(derive_status(&ahmet, &reversed).presence, Presence::Present);
    }

    #[test]
    fn roster_keeps_order_and_derives_each_person() {
        let people = vec![
            person("Ahmet", "ahmet@x.com"),
            person("Zeynep", "zeynep@x.com"),
        ];
        let events = vec![event(
            1,
            "zeynep@x.com",
            "2024-07-28T09:00:00Z",
            ActivityKind::Entry,
        )];

        let roster = roster_status(&people, &events);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].person.name, "Ahmet");
        assert_eq!(roster[0].status.presence, Presence::Absent);
        assert_eq!(roster[1].person.name, "Zeynep");
        assert_eq!(roster[1].status.presence, Presence::Present);
    }
}
