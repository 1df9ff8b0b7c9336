//! Validated scalar values carried by planning entities.

use super::PlanningDomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Longest email address accepted (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Longest local part accepted (RFC 5321).
const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Dot-atom local part followed by LDH domain labels, ASCII only.
const EMAIL_PATTERN: &str = concat!(
    r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
    r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
);

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Syntactically valid email address, unique per person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address, trimmed and lower-cased so that
    /// uniqueness ignores case.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::InvalidEmail`] when the address is not
    /// an ASCII dot-atom local part (at most 64 characters) followed by a
    /// domain of at least two hostname labels.
    pub fn new(value: impl Into<String>) -> Result<Self, PlanningDomainError> {
        let raw = value.into();
        let candidate = raw.trim();
        if !is_valid_email(candidate) {
            return Err(PlanningDomainError::InvalidEmail(raw));
        }
        Ok(Self(candidate.to_ascii_lowercase()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_email(candidate: &str) -> bool {
    if candidate.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    if local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(candidate))
}

impl TryFrom<String> for EmailAddress {
    type Error = PlanningDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-blank task name, unique across all tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskName(String);

impl TaskName {
    /// Creates a validated task name with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyTaskName`] when the name is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, PlanningDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlanningDomainError::EmptyTaskName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskName {
    type Error = PlanningDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskName> for String {
    fn from(name: TaskName) -> Self {
        name.0
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
