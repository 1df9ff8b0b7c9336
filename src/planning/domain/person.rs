//! Person aggregate: an employee or user who can be assigned to tasks.

use super::{EmailAddress, Field, PersonId};
use serde::{Deserialize, Serialize};

/// An employee or user.
///
/// First and last names default to an empty string; clearing either one with
/// an explicit `null` resets it to empty rather than removing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    first_name: String,
    last_name: String,
    email: EmailAddress,
}

/// Data required to reconstruct a persisted person.
#[derive(Debug, Clone)]
pub struct PersistedPersonData {
    /// Person identifier.
    pub id: PersonId,
    /// Stored first name.
    pub first_name: String,
    /// Stored last name.
    pub last_name: String,
    /// Stored email address.
    pub email: EmailAddress,
}

/// Validated partial update for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    /// New first name.
    pub first_name: Field<String>,
    /// New last name.
    pub last_name: Field<String>,
    /// New email address; `None` keeps the current one.
    pub email: Option<EmailAddress>,
}

impl Person {
    /// Creates a person with empty names.
    #[must_use]
    pub const fn new(id: PersonId, email: EmailAddress) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            email,
        }
    }

    /// Reconstructs a person from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPersonData) -> Self {
        Self {
            id: data.id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
        }
    }

    /// Returns the person identifier.
    #[must_use]
    pub const fn id(&self) -> PersonId {
        self.id
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Applies a validated partial update.
    pub fn apply(&mut self, patch: PersonPatch) {
        apply_name(&mut self.first_name, patch.first_name);
        apply_name(&mut self.last_name, patch.last_name);
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

fn apply_name(slot: &mut String, field: Field<String>) {
    match field {
        Field::Unset => {}
        Field::Null => slot.clear(),
        Field::Value(value) => *slot = value,
    }
}
