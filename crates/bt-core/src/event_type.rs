//! Event type enum as the single source of truth for event type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical activity event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Entry,
    Exit,
    Task,
    LeaveRequest,
}

impl EventType {
    /// Whether this event type is a clock event that affects presence.
    pub const fn is_clock(self) -> bool {
        matches!(self, Self::Entry | Self::Exit)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Entry => "ENTRY",
            Self::Exit => "EXIT",
            Self::Task => "TASK",
            Self::LeaveRequest => "LEAVE_REQUEST",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENTRY" | "QR_ENTRY" => Ok(Self::Entry),
            "EXIT" | "QR_EXIT" => Ok(Self::Exit),
            "TASK" => Ok(Self::Task),
            "LEAVE_REQUEST" => Ok(Self::LeaveRequest),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event type strings.
#[derive(Debug, Clone)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        let variants = [
            EventType::Entry,
            EventType::Exit,
            EventType::Task,
            EventType::LeaveRequest,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed: EventType = s.parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn legacy_qr_aliases_parse() {
        let entry: EventType = "QR_ENTRY".parse().expect("should parse");
        assert_eq!(entry, EventType::Entry);

        let exit: EventType = "QR_EXIT".parse().expect("should parse");
        assert_eq!(exit, EventType::Exit);
    }

    #[test]
    fn only_entry_and_exit_are_clock_events() {
        assert!(EventType::Entry.is_clock());
        assert!(EventType::Exit.is_clock());
        assert!(!EventType::Task.is_clock());
        assert!(!EventType::LeaveRequest.is_clock());
    }

    #[test]
    fn unknown_type_errors() {
        let result: Result<EventType, _> = "entry".parse();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown event type: entry");
    }
}
