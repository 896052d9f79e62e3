use serde::{Deserialize, Serialize};

pub mod product;
pub mod retailer;
pub mod price_result;

// Re-exports for convenience
pub use product::*;
pub use retailer::*;
pub use price_result::*;

// Common enums used across models

/// How a result item is confirmed to be the product we searched for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The item text must contain the EAN (case-insensitive substring).
    ByIdentifierInText,
    /// Listing order is trusted; every item matches.
    None,
}

/// Which field of the product is typed into the retailer's search box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchTermSource {
    Identifier,
    DisplayTerm,
}

impl SearchTermSource {
    pub fn select<'a>(&self, query: &'a ProductQuery) -> &'a str {
        match self {
            SearchTermSource::Identifier => query.identifier.trim(),
            SearchTermSource::DisplayTerm => query.display_term.trim(),
        }
    }
}
