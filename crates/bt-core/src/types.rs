//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A person name shorter than the allowed minimum.
    #[error("name must be at least {min} characters, got {len}")]
    NameTooShort { min: usize, len: usize },

    /// The value is not a usable email address.
    #[error("invalid email address: {value}")]
    InvalidEmail { value: String },

    /// Invalid role value.
    #[error("invalid role: {value}")]
    InvalidRole { value: String },

    /// Invalid task status value.
    #[error("invalid task status: {value}")]
    InvalidTaskStatus { value: String },

    /// Invalid leave status value.
    #[error("invalid leave status: {value}")]
    InvalidLeaveStatus { value: String },

    /// Invalid membership status value.
    #[error("invalid membership status: {value}")]
    InvalidMembershipStatus { value: String },

    /// Leave reason outside the accepted length window.
    #[error("leave reason must be between {min} and {max} characters, got {len}")]
    ReasonLength { min: usize, max: usize, len: usize },

    /// A date range whose end precedes its start.
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: String, end: String },
}

/// Access level of a registered person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The privileged "patron" role: approves leave, manages personnel.
    Admin,
    /// Regular staff.
    Employee,
}

impl Role {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(ValidationError::InvalidRole {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated person identifier.
    ///
    /// Assigned by the personnel store on registration.
    PersonId, "person ID"
);

define_string_id!(
    /// A validated activity event identifier.
    ///
    /// Assigned by the activity store on append. Leave requests share this
    /// identifier with the activity event that records them.
    ActivityId, "activity ID"
);

define_string_id!(
    /// A validated membership record identifier.
    MemberId, "member ID"
);

/// A normalized email address, the identity key for people.
///
/// Surrounding whitespace is stripped and the address is lowercased, so two
/// spellings of the same mailbox compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        let valid = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !normalized.contains(char::is_whitespace)
            });
        if !valid {
            return Err(ValidationError::InvalidEmail {
                value: value.as_ref().to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before `@`, used as a display name fallback.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
