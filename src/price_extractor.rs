use rust_decimal::Decimal;
use scraper::Selector;

use crate::item_matcher::ItemMatcher;
use crate::models::{
    CandidateError, CandidateFailure, Extraction, ExtractionFailure, PriceLocator, ProductQuery,
    RetailerStrategy,
};
use crate::price_parser::PriceNormalizer;
use crate::scraper::{ItemFragment, parse_selector};
use crate::utils::error::Result;

const DEFAULT_CENTS: &str = "00";

/// Full result of one extraction pass, including the candidates that were
/// matched but had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub extraction: Extraction,
    pub matched: usize,
    pub skipped: Vec<CandidateFailure>,
}

enum CompiledLocator {
    OwnText,
    Text {
        selector: Selector,
        source: String,
    },
    Split {
        whole: Selector,
        whole_source: String,
        cents: Selector,
    },
}

impl CompiledLocator {
    fn compile(locator: &PriceLocator) -> Result<Self> {
        Ok(match locator {
            PriceLocator::Text { selector: None } => CompiledLocator::OwnText,
            PriceLocator::Text { selector: Some(selector) } => CompiledLocator::Text {
                selector: parse_selector(selector)?,
                source: selector.clone(),
            },
            PriceLocator::Split { whole, cents } => CompiledLocator::Split {
                whole: parse_selector(whole)?,
                whole_source: whole.clone(),
                cents: parse_selector(cents)?,
            },
        })
    }

    fn price_text(&self, fragment: &ItemFragment) -> std::result::Result<String, CandidateError> {
        match self {
            CompiledLocator::OwnText => Ok(fragment.text.clone()),
            CompiledLocator::Text { selector, source } => fragment
                .first_text(selector)
                .ok_or_else(|| CandidateError::MissingPrice {
                    selector: source.clone(),
                }),
            CompiledLocator::Split {
                whole,
                whole_source,
                cents,
            } => {
                let whole_text = fragment.first_text(whole).ok_or_else(|| {
                    CandidateError::MissingPrice {
                        selector: whole_source.clone(),
                    }
                })?;
                let cents_text = fragment
                    .first_text(cents)
                    .unwrap_or_else(|| DEFAULT_CENTS.to_string());
                Ok(format!("{},{}", whole_text, cents_text))
            }
        }
    }
}

/// Reads matched, normalized prices out of a retailer's result items.
///
/// Pure with respect to its inputs: the same fragments and strategy always
/// give the same outcome.
#[derive(Debug, Clone, Default)]
pub struct PriceExtractor {
    normalizer: PriceNormalizer,
}

impl PriceExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(
        &self,
        strategy: &RetailerStrategy,
        fragments: &[ItemFragment],
        query: &ProductQuery,
        max_candidates: usize,
        max_results: usize,
    ) -> Extraction {
        self.extract_detailed(strategy, fragments, query, max_candidates, max_results)
            .extraction
    }

    pub fn extract_detailed(
        &self,
        strategy: &RetailerStrategy,
        fragments: &[ItemFragment],
        query: &ProductQuery,
        max_candidates: usize,
        max_results: usize,
    ) -> ExtractionOutcome {
        let locator = match CompiledLocator::compile(&strategy.price) {
            Ok(locator) => locator,
            Err(e) => {
                return ExtractionOutcome {
                    extraction: Extraction::Failure(ExtractionFailure::Error {
                        message: e.to_string(),
                    }),
                    matched: 0,
                    skipped: Vec::new(),
                };
            }
        };

        let matcher = ItemMatcher::new(strategy.match_mode, strategy.display_term_fallback);
        let display_term = query.display_term();

        let mut prices: Vec<Decimal> = Vec::new();
        let mut skipped = Vec::new();
        let mut matched = 0;

        for (index, fragment) in fragments.iter().take(max_candidates).enumerate() {
            if !matcher.matches(&fragment.text, &query.identifier, display_term) {
                continue;
            }
            matched += 1;

            match self.candidate_price(&locator, fragment) {
                Ok(price) => prices.push(price),
                Err(error) => {
                    tracing::debug!("{}: skipping item {}: {}", strategy.name, index, error);
                    skipped.push(CandidateFailure { index, error });
                }
            }
        }

        tracing::debug!(
            "{} (EAN {}): {} of {} items matched, {} valid prices, {} skipped",
            strategy.name,
            query.identifier,
            matched,
            fragments.len().min(max_candidates),
            prices.len(),
            skipped.len()
        );

        ExtractionOutcome {
            extraction: Extraction::from_prices(prices, max_results),
            matched,
            skipped,
        }
    }

    fn candidate_price(
        &self,
        locator: &CompiledLocator,
        fragment: &ItemFragment,
    ) -> std::result::Result<Decimal, CandidateError> {
        let text = locator.price_text(fragment)?;
        self.normalizer
            .normalize(&text)
            .map_err(|_| CandidateError::Unparseable { text })
    }
}
