//! Tri-state values for partial updates.

use serde::{Deserialize, Deserializer};

/// A payload value that distinguishes "absent" from "explicitly null".
///
/// Payload structs mark every `Field` with `#[serde(default)]`, so a key that
/// is missing from the payload decodes as [`Field::Unset`] while a key holding
/// `null` decodes as [`Field::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// The key was absent; the stored value stays unchanged.
    Unset,
    /// The key was present with `null`; the stored value is cleared.
    Null,
    /// The key carried a value.
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Field<T> {
    /// Returns `true` when the key was absent from the payload.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Converts the carried value, keeping `Unset` and `Null` as they are.
    ///
    /// # Errors
    ///
    /// Returns the conversion error unchanged.
    pub fn try_map<U, E>(self, convert: impl FnOnce(T) -> Result<U, E>) -> Result<Field<U>, E> {
        match self {
            Self::Unset => Ok(Field::Unset),
            Self::Null => Ok(Field::Null),
            Self::Value(value) => convert(value).map(Field::Value),
        }
    }

    /// Writes the field into an optional slot.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Unset => {}
            Self::Null => *slot = None,
            Self::Value(value) => *slot = Some(value),
        }
    }

    /// Returns the carried value, treating `Unset` and `Null` alike.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Null => None,
        }
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Value))
    }
}
