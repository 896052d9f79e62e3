use serde::{Deserialize, Serialize};

/// One product to look up, built from a single input row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductQuery {
    /// EAN code. Treated as an opaque string.
    pub identifier: String,
    /// Free-text search term; may be empty.
    pub display_term: String,
}

impl ProductQuery {
    pub fn new(identifier: impl Into<String>, display_term: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_term: display_term.into(),
        }
    }

    pub fn display_term(&self) -> Option<&str> {
        let term = self.display_term.trim();
        if term.is_empty() { None } else { Some(term) }
    }
}
