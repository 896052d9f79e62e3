use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a retailer (or a single price text) produced no usable price.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionFailure {
    #[error("no matching price found")]
    NotFound,

    #[error("timed out waiting for prices")]
    Timeout,

    #[error("could not parse price from '{text}'")]
    ParseError { text: String },

    #[error("extraction failed: {message}")]
    Error { message: String },
}

/// Outcome of extracting one retailer's result page.
///
/// Either a non-empty ascending list of prices or a single failure, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Prices(Vec<Decimal>),
    Failure(ExtractionFailure),
}

#[allow(clippy::len_without_is_empty)]
impl Extraction {
    /// Sorts ascending and keeps the `max_results` lowest; empty input is `NotFound`.
    pub fn from_prices(mut prices: Vec<Decimal>, max_results: usize) -> Self {
        if prices.is_empty() || max_results == 0 {
            return Extraction::Failure(ExtractionFailure::NotFound);
        }
        prices.sort();
        prices.truncate(max_results);
        Extraction::Prices(prices)
    }

    pub fn prices(&self) -> Option<&[Decimal]> {
        match self {
            Extraction::Prices(prices) => Some(prices),
            Extraction::Failure(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Extraction::Prices(prices) => prices.len(),
            Extraction::Failure(_) => 1,
        }
    }
}

/// A result item that matched but whose price could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("price element '{selector}' not found")]
    MissingPrice { selector: String },

    #[error("unparseable price text '{text}'")]
    Unparseable { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    /// Position of the item on the results page.
    pub index: usize,
    pub error: CandidateError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetailerOutcome {
    Extracted(Extraction),
    /// The term this retailer searches by was empty; nothing was requested.
    EmptySearchTerm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailerResult {
    pub retailer: String,
    pub outcome: RetailerOutcome,
}

impl RetailerResult {
    pub fn extracted(retailer: impl Into<String>, extraction: Extraction) -> Self {
        Self {
            retailer: retailer.into(),
            outcome: RetailerOutcome::Extracted(extraction),
        }
    }

    pub fn failed(retailer: impl Into<String>, failure: ExtractionFailure) -> Self {
        Self::extracted(retailer, Extraction::Failure(failure))
    }

    pub fn empty_search_term(retailer: impl Into<String>) -> Self {
        Self {
            retailer: retailer.into(),
            outcome: RetailerOutcome::EmptySearchTerm,
        }
    }
}
