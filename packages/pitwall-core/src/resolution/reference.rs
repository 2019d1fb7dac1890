//! Resolved-or-unresolved reference

use serde::{Serialize, Serializer};

/// Outcome of looking up one foreign key
///
/// Serializes as the entity itself when resolved and as `null` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<T> {
    Resolved(T),
    Unresolved,
}

impl<T> Reference<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }

    pub fn as_ref(&self) -> Reference<&T> {
        match self {
            Reference::Resolved(value) => Reference::Resolved(value),
            Reference::Unresolved => Reference::Unresolved,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reference<U> {
        match self {
            Reference::Resolved(value) => Reference::Resolved(f(value)),
            Reference::Unresolved => Reference::Unresolved,
        }
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Reference::Resolved(value) => Some(value),
            Reference::Unresolved => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Reference::Resolved(value) => Some(value),
            Reference::Unresolved => None,
        }
    }
}

impl<T: Clone> Reference<&T> {
    pub fn cloned(self) -> Reference<T> {
        self.map(T::clone)
    }
}

impl<T> From<Option<T>> for Reference<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Reference::Resolved(value),
            None => Reference::Unresolved,
        }
    }
}

impl<T: Serialize> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reference::Resolved(value) => value.serialize(serializer),
            Reference::Unresolved => serializer.serialize_none(),
        }
    }
}
