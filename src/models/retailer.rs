use serde::{Deserialize, Serialize};
use url::{Url, form_urlencoded};

use crate::models::{MatchMode, SearchTermSource};
use crate::scraper::parse_selector;
use crate::utils::error::{AppError, Result};

const TERM_SLOT: &str = "{}";

/// Where the price text lives inside one result item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceLocator {
    /// Text of the first element matching `selector`, or the item's own text.
    Text {
        #[serde(default)]
        selector: Option<String>,
    },
    /// Whole and cents rendered in separate elements.
    Split { whole: String, cents: String },
}

/// Static per-retailer configuration: how to query and how to read prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetailerStrategy {
    pub name: String,
    /// Search URL with a single `{}` slot for the search term.
    pub query_url_template: String,
    /// Element that must show up before the page counts as rendered.
    pub wait_selector: String,
    /// One match per candidate listing.
    pub item_selector: String,
    pub price: PriceLocator,
    pub match_mode: MatchMode,
    pub search_term: SearchTermSource,
    /// Also accept items whose text contains the display term.
    #[serde(default)]
    pub display_term_fallback: bool,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_max_candidates() -> usize {
    5
}

impl RetailerStrategy {
    pub fn query_url(&self, term: &str) -> Result<Url> {
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
        let url = Url::parse(&self.query_url_template.replacen(TERM_SLOT, &encoded, 1))?;
        Ok(url)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Retailer name must not be empty".into());
        }

        if self.query_url_template.matches(TERM_SLOT).count() != 1 {
            return Err(format!(
                "Retailer '{}' query_url_template must contain exactly one '{{}}' slot",
                self.name
            ));
        }

        if self.max_candidates == 0 {
            return Err(format!(
                "Retailer '{}' max_candidates must be greater than 0",
                self.name
            ));
        }

        for selector in self.selectors() {
            if let Err(AppError::InvalidSelector { selector, message }) = parse_selector(selector) {
                return Err(format!(
                    "Retailer '{}' has invalid selector '{}': {}",
                    self.name, selector, message
                ));
            }
        }

        Ok(())
    }

    fn selectors(&self) -> Vec<&str> {
        let mut selectors = vec![self.wait_selector.as_str(), self.item_selector.as_str()];
        match &self.price {
            PriceLocator::Text { selector } => selectors.extend(selector.as_deref()),
            PriceLocator::Split { whole, cents } => {
                selectors.push(whole);
                selectors.push(cents);
            }
        }
        selectors
    }

    /// The three retailers of the reference deployment.
    pub fn defaults() -> Vec<RetailerStrategy> {
        vec![
            RetailerStrategy {
                name: "Mercado Livre".to_string(),
                query_url_template: "https://www.mercadolivre.com.br/search?query={}".to_string(),
                wait_selector: "span.andes-money-amount__fraction".to_string(),
                item_selector: "li.ui-search-layout__item".to_string(),
                price: PriceLocator::Split {
                    whole: "span.andes-money-amount__fraction".to_string(),
                    cents: "span.andes-money-amount__cents".to_string(),
                },
                match_mode: MatchMode::ByIdentifierInText,
                search_term: SearchTermSource::DisplayTerm,
                display_term_fallback: false,
                max_candidates: 10,
            },
            RetailerStrategy {
                name: "Amazon".to_string(),
                query_url_template: "https://www.amazon.com.br/s?k={}".to_string(),
                wait_selector: "span.a-price-whole".to_string(),
                item_selector: "div.s-result-item".to_string(),
                price: PriceLocator::Split {
                    whole: "span.a-price-whole".to_string(),
                    cents: "span.a-price-fraction".to_string(),
                },
                match_mode: MatchMode::None,
                search_term: SearchTermSource::Identifier,
                display_term_fallback: false,
                max_candidates: 5,
            },
            RetailerStrategy {
                name: "Magazine Luiza".to_string(),
                query_url_template: "https://www.magazineluiza.com.br/busca/{}".to_string(),
                wait_selector: "p[data-testid='price-value']".to_string(),
                item_selector: "p[data-testid='price-value']".to_string(),
                price: PriceLocator::Text { selector: None },
                match_mode: MatchMode::None,
                search_term: SearchTermSource::Identifier,
                display_term_fallback: false,
                max_candidates: 5,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mercado_livre() -> RetailerStrategy {
        RetailerStrategy::defaults().remove(0)
    }

    #[test]
    fn test_query_url_encodes_term() {
        let url = mercado_livre().query_url("Dove Shampoo 400ml").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.mercadolivre.com.br/search?query=Dove+Shampoo+400ml"
        );
    }

    #[test]
    fn test_query_url_path_slot() {
        let magalu = RetailerStrategy::defaults().remove(2);
        let url = magalu.query_url("7503002941409").unwrap();
        assert_eq!(url.as_str(), "https://www.magazineluiza.com.br/busca/7503002941409");
    }

    #[test]
    fn test_defaults_are_valid() {
        for strategy in RetailerStrategy::defaults() {
            assert!(strategy.validate().is_ok(), "{} should be valid", strategy.name);
        }
    }

    #[test]
    fn test_validate_rejects_missing_slot() {
        let mut strategy = mercado_livre();
        strategy.query_url_template = "https://www.mercadolivre.com.br/search".to_string();

        let result = strategy.validate();
        assert!(result.unwrap_err().contains("exactly one '{}' slot"));
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let mut strategy = mercado_livre();
        strategy.price = PriceLocator::Split {
            whole: "div >".to_string(),
            cents: "span.cents".to_string(),
        };

        let result = strategy.validate();
        assert!(result.unwrap_err().contains("invalid selector 'div >'"));
    }

    #[test]
    fn test_validate_rejects_zero_candidates() {
        let mut strategy = mercado_livre();
        strategy.max_candidates = 0;

        assert!(strategy.validate().is_err());
    }
}
