//! Customer memberships.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Email, MemberId, ValidationError};

/// Standing of a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Inactive,
    Expired,
}

impl MembershipStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "expired" => Ok(Self::Expired),
            _ => Err(ValidationError::InvalidMembershipStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// A membership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MemberId,
    /// Human-facing code such as `MEM001`. Unique.
    pub member_code: String,
    pub name: String,
    pub email: Email,
    pub status: MembershipStatus,
    pub joined_on: NaiveDate,
    pub last_visit: NaiveDate,
}

/// Editable membership fields. Join date and last visit are kept by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipInput {
    pub member_code: String,
    pub name: String,
    pub email: Email,
    pub status: MembershipStatus,
}

impl MembershipInput {
    /// Trims text fields and rejects blanks.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let member_code = self.member_code.trim().to_string();
        if member_code.is_empty() {
            return Err(ValidationError::Empty {
                field: "member code",
            });
        }
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self {
            member_code,
            name,
            ..self
        })
    }
}

/// Members whose name, code or email contains `term`, ignoring case.
pub fn search_members<'a>(members: &'a [Membership], term: &str) -> Vec<&'a Membership> {
    let term = term.to_lowercase();
    members
        .iter()
        .filter(|member| {
            member.name.to_lowercase().contains(&term)
                || member.member_code.to_lowercase().contains(&term)
                || member.email.as_str().contains(&term)
        })
        .collect()
}
