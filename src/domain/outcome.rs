//! Explicit results for "create if absent, else return existing" store
//! operations, so callers can tell a first creation from a no-op.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum GetOrCreate<T> {
    Created(T),
    Existing(T),
}

impl<T> GetOrCreate<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, GetOrCreate::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            GetOrCreate::Created(t) | GetOrCreate::Existing(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            GetOrCreate::Created(t) | GetOrCreate::Existing(t) => t,
        }
    }
}

/// Result of adding a book to a wishlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishOutcome {
    /// A new row was inserted
    Created,
    /// The wish was already active; nothing changed
    AlreadyActive,
    /// A previously removed row was reactivated
    Revived,
}
