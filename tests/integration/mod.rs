// Shared fixtures for the integration tests: a scripted renderer that serves
// canned result pages instead of driving a browser.

pub mod comparison_tests;
pub mod run_tests;

use async_trait::async_trait;
use ean_price_compare::{
    AppConfig, AppError, ItemFragment, PageRenderer, ProductQuery, scraper::fragments_from_html,
};
use std::time::Duration;

pub const EAN: &str = "7503002941409";
pub const PRODUCT: &str = "Dove Shampoo 400ml";

/// What a scripted retailer page does when visited.
#[derive(Debug, Clone)]
pub enum PageScript {
    Html(String),
    Timeout,
    NavigationError(String),
    /// Navigation succeeds but the browser fails while waiting for results.
    WaitError(String),
}

/// In-memory `PageRenderer`; pages are keyed by a substring of the URL.
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    pages: Vec<(String, PageScript)>,
    current: Option<PageScript>,
    pub visited: Vec<String>,
    pub close_calls: usize,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url_fragment: &str, script: PageScript) -> Self {
        self.pages.push((url_fragment.to_string(), script));
        self
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), AppError> {
        self.visited.push(url.to_string());
        let script = self
            .pages
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, script)| script.clone())
            .unwrap_or_else(|| PageScript::Html(String::new()));

        if let PageScript::NavigationError(message) = &script {
            return Err(AppError::Browser(message.clone()));
        }
        self.current = Some(script);
        Ok(())
    }

    async fn wait_for_selector(&mut self, _selector: &str, _timeout: Duration) -> Result<bool, AppError> {
        match &self.current {
            Some(PageScript::Timeout) => Ok(false),
            Some(PageScript::WaitError(message)) => Err(AppError::Browser(message.clone())),
            _ => Ok(true),
        }
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<ItemFragment>, AppError> {
        match &self.current {
            Some(PageScript::Html(html)) => fragments_from_html(html, selector),
            _ => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.close_calls += 1;
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.pacing.enabled = false;
    config
}

pub fn dove() -> ProductQuery {
    ProductQuery::new(EAN, PRODUCT)
}

/// Mercado Livre style results page: one `li` per listing with split prices.
pub fn mercado_livre_page(listings: &[(&str, &str, Option<&str>)]) -> String {
    let items: String = listings
        .iter()
        .map(|(title, whole, cents)| {
            let cents = cents
                .map(|c| format!(r#"<span class="andes-money-amount__cents">{}</span>"#, c))
                .unwrap_or_default();
            format!(
                r#"<li class="ui-search-layout__item"><h2>{}</h2><span class="andes-money-amount__fraction">{}</span>{}</li>"#,
                title, whole, cents
            )
        })
        .collect();
    format!("<html><body><ol>{}</ol></body></html>", items)
}

/// Magazine Luiza style results page: bare price paragraphs.
pub fn magalu_page(prices: &[&str]) -> String {
    let items: String = prices
        .iter()
        .map(|price| format!(r#"<p data-testid="price-value">{}</p>"#, price))
        .collect();
    format!("<html><body><div>{}</div></body></html>", items)
}
