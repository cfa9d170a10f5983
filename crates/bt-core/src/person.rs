//! Registered personnel.

use serde::{Deserialize, Serialize};

use crate::types::{Email, PersonId, Role, ValidationError};

/// Minimum length of a person's display name.
pub const MIN_NAME_LEN: usize = 2;

/// A registered person. Identity key is the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Trims and checks a person name.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::Empty { field: "name" });
    }
    if len < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort {
            min: MIN_NAME_LEN,
            len,
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_trims() {
        assert_eq!(validate_name("  Ahmet Kaya ").unwrap(), "Ahmet Kaya");
    }

    #[test]
    fn validate_name_counts_characters_not_bytes() {
        assert_eq!(
            validate_name("Ş"),
            Err(ValidationError::NameTooShort { min: 2, len: 1 })
        );
        assert!(validate_name("Öz").is_ok());
    }

    #[test]
    fn validate_name_rejects_blank() {
        assert_eq!(
            validate_name("   "),
            Err(ValidationError::Empty { field: "name" })
        );
    }
}
