use crate::config::AppConfig;
use crate::models::ProductQuery;
use crate::pacing::Pacer;
use crate::price_comparator::PriceComparator;
use crate::report::{ReportFormatter, ReportTable};
use crate::scraper::PageRenderer;

/// Runs every product through every configured retailer and collects the
/// formatted rows in input order.
pub async fn run_comparison<R: PageRenderer>(
    renderer: &mut R,
    products: &[ProductQuery],
    config: &AppConfig,
    pacer: Pacer,
) -> ReportTable {
    let formatter = ReportFormatter::new(config.report.clone());
    let mut table = ReportTable::new(config.retailer_names());
    let mut comparator = PriceComparator::new(renderer, &config.retailers, &config.extraction, pacer);

    for (position, query) in products.iter().enumerate() {
        tracing::info!(
            "Processing EAN {} (product: {}) [{}/{}]",
            query.identifier,
            query.display_term,
            position + 1,
            products.len()
        );

        let results = comparator.compare(query).await;
        let row = formatter.row(query, &results);

        if let Err(e) = table.push(row) {
            tracing::error!("Dropping row for EAN {}: {}", query.identifier, e);
        }
    }

    table
}
