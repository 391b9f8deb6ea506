//! Identifier newtypes with smart constructors.
//!
//! Identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;
use thiserror::Error;

/// Identifier of a feed tab (e.g. "discover", "shorts").
///
/// Tab ids key the session registry, so they must be stable and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(String);

impl TabId {
    /// Smart constructor: trims surrounding whitespace and rejects empty ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTabId> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidTabId::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected tab identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTabId {
    /// Empty or whitespace-only input.
    #[error("tab id cannot be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_id_accepts_plain_name() {
        let id = TabId::new("discover").expect("valid tab id");
        assert_eq!(id.as_str(), "discover");
        assert_eq!(id.to_string(), "discover");
    }

    #[test]
    fn tab_id_trims_whitespace() {
        let id = TabId::new("  shorts ").expect("valid tab id");
        assert_eq!(id.as_str(), "shorts");
    }

    #[test]
    fn tab_id_rejects_empty() {
        assert_eq!(TabId::new(""), Err(InvalidTabId::Empty));
    }

    #[test]
    fn tab_id_rejects_whitespace_only() {
        assert_eq!(TabId::new("   "), Err(InvalidTabId::Empty));
    }
}
