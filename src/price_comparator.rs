use std::time::Duration;

use crate::config::ExtractionConfig;
use crate::models::{Extraction, ExtractionFailure, ProductQuery, RetailerResult, RetailerStrategy};
use crate::pacing::Pacer;
use crate::price_extractor::PriceExtractor;
use crate::scraper::PageRenderer;
use crate::utils::error::Result;

/// Queries every configured retailer for one product at a time, in
/// configuration order, through a single shared renderer.
pub struct PriceComparator<'a, R: PageRenderer> {
    renderer: &'a mut R,
    strategies: &'a [RetailerStrategy],
    extractor: PriceExtractor,
    pacer: Pacer,
    wait_timeout: Duration,
    max_results: usize,
}

impl<'a, R: PageRenderer> PriceComparator<'a, R> {
    pub fn new(
        renderer: &'a mut R,
        strategies: &'a [RetailerStrategy],
        extraction: &ExtractionConfig,
        pacer: Pacer,
    ) -> Self {
        Self {
            renderer,
            strategies,
            extractor: PriceExtractor::new(),
            pacer,
            wait_timeout: Duration::from_secs(extraction.wait_timeout_secs),
            max_results: extraction.max_results,
        }
    }

    /// One result per configured retailer, in configuration order. A failing
    /// retailer is recorded and never stops the ones after it.
    pub async fn compare(&mut self, query: &ProductQuery) -> Vec<RetailerResult> {
        let mut results = Vec::with_capacity(self.strategies.len());

        for strategy in self.strategies {
            let term = strategy.search_term.select(query);
            if term.is_empty() {
                tracing::warn!("{}: empty search term for EAN {}, skipping", strategy.name, query.identifier);
                results.push(RetailerResult::empty_search_term(&strategy.name));
                continue;
            }

            let extraction = match self.query_retailer(strategy, term, query).await {
                Ok(extraction) => extraction,
                Err(e) => {
                    tracing::error!("{} (EAN {}): lookup failed: {}", strategy.name, query.identifier, e);
                    Extraction::Failure(ExtractionFailure::Error {
                        message: e.to_string(),
                    })
                }
            };

            match &extraction {
                Extraction::Prices(prices) => tracing::info!(
                    "{} (EAN {}): found {} price(s)",
                    strategy.name,
                    query.identifier,
                    prices.len()
                ),
                Extraction::Failure(failure) => tracing::info!(
                    "{} (EAN {}): {}",
                    strategy.name,
                    query.identifier,
                    failure
                ),
            }

            results.push(RetailerResult::extracted(&strategy.name, extraction));
            self.pacer.pause().await;
        }

        results
    }

    async fn query_retailer(
        &mut self,
        strategy: &RetailerStrategy,
        term: &str,
        query: &ProductQuery,
    ) -> Result<Extraction> {
        let url = strategy.query_url(term)?;
        tracing::info!("Querying {} for '{}' (EAN: {})", strategy.name, term, query.identifier);

        self.renderer.navigate(url.as_str()).await?;

        if !self
            .renderer
            .wait_for_selector(&strategy.wait_selector, self.wait_timeout)
            .await?
        {
            tracing::warn!(
                "{} (EAN {}): selector '{}' did not appear within {}s",
                strategy.name,
                query.identifier,
                strategy.wait_selector,
                self.wait_timeout.as_secs()
            );
            return Ok(Extraction::Failure(ExtractionFailure::Timeout));
        }

        let fragments = self.renderer.find_all(&strategy.item_selector).await?;
        let outcome = self.extractor.extract_detailed(
            strategy,
            &fragments,
            query,
            strategy.max_candidates,
            self.max_results,
        );

        if !outcome.skipped.is_empty() {
            tracing::warn!(
                "{} (EAN {}): skipped {} matched item(s) without a readable price",
                strategy.name,
                query.identifier,
                outcome.skipped.len()
            );
        }

        Ok(outcome.extraction)
    }
}
