//! Priority and status classifications for tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a priority or status label is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {enumeration} value: {value}")]
pub struct InvalidEnumValue {
    /// Name of the enumeration being parsed.
    pub enumeration: &'static str,
    /// Rejected input.
    pub value: String,
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Should be picked up soon.
    High,
    /// Must be picked up immediately.
    Urgent,
}

impl Priority {
    /// Every priority in ascending urgency.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Returns the label shown to shop-floor users.
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Low => "Niski",
            Self::Medium => "Średni",
            Self::High => "Wysoki",
            Self::Urgent => "Pilny",
        }
    }

    /// Parses a priority from its code or display label, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEnumValue`] when the label matches no priority.
    pub fn from_label(label: &str) -> Result<Self, InvalidEnumValue> {
        find_by_label(&Self::ALL, label, |p| [p.as_str(), p.display_label()]).ok_or_else(|| {
            InvalidEnumValue {
                enumeration: "priority",
                value: label.to_owned(),
            }
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

impl TryFrom<&str> for Priority {
    type Error = InvalidEnumValue;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_label(value)
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Just registered.
    New,
    /// Scheduled for work.
    Todo,
    /// Being worked on.
    InProgress,
    /// Accepted by the planner.
    Accepted,
    /// Waiting for tests.
    Test,
    /// Ready to be closed.
    Ready,
    /// Finished.
    Closed,
}

impl Status {
    /// Every status in workflow order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Todo,
        Self::InProgress,
        Self::Accepted,
        Self::Test,
        Self::Ready,
        Self::Closed,
    ];

    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Accepted => "accepted",
            Self::Test => "test",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }

    /// Returns the label shown to shop-floor users.
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::New => "Nowy",
            Self::Todo => "TODO",
            Self::InProgress => "W trakcie",
            Self::Accepted => "Zaakceptowany",
            Self::Test => "Do testów",
            Self::Ready => "Gotowy do zamknięcia",
            Self::Closed => "Zamknięty",
        }
    }

    /// Parses a status from its code or display label, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEnumValue`] when the label matches no status.
    pub fn from_label(label: &str) -> Result<Self, InvalidEnumValue> {
        find_by_label(&Self::ALL, label, |s| [s.as_str(), s.display_label()]).ok_or_else(|| {
            InvalidEnumValue {
                enumeration: "status",
                value: label.to_owned(),
            }
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

impl TryFrom<&str> for Status {
    type Error = InvalidEnumValue;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_label(value)
    }
}

fn find_by_label<T: Copy>(
    candidates: &[T],
    label: &str,
    labels_of: impl Fn(T) -> [&'static str; 2],
) -> Option<T> {
    let wanted = label.trim().to_lowercase();
    candidates.iter().copied().find(|candidate| {
        labels_of(*candidate)
            .iter()
            .any(|known| known.to_lowercase() == wanted)
    })
}
