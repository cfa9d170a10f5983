//! Explicit actor context for operations that need an identity.

use serde::Serialize;
use thiserror::Error;

use crate::person::Person;
use crate::types::{Email, Role};

/// Authorization failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No logged-in actor.
    #[error("this action requires a logged-in user")]
    Unauthenticated,

    /// The actor lacks the privileged role.
    #[error("{email} is not allowed to perform this action")]
    Forbidden { email: Email },
}

/// The authenticated actor performing an operation.
///
/// Ownership fields on created records are always taken from here, never from
/// user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: Email,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub fn new(email: Email, name: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            email.local_part().to_string()
        } else {
            name
        };
        Self { email, name, role }
    }

    pub fn for_person(person: &Person) -> Self {
        Self::new(person.email.clone(), person.name.clone(), person.role)
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                email: self.email.clone(),
            })
        }
    }
}

/// Unwraps an optional session, failing when nobody is logged in.
pub fn require_session(session: Option<&Session>) -> Result<&Session, AuthError> {
    session.ok_or(AuthError::Unauthenticated)
}
