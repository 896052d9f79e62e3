use rust_decimal::{Decimal, RoundingStrategy};
use std::path::Path;

use crate::config::ReportConfig;
use crate::models::{Extraction, ExtractionFailure, ProductQuery, RetailerOutcome, RetailerResult};
use crate::utils::error::{AppError, Result};

const EAN_COLUMN: &str = "EAN";
const PRODUCT_COLUMN: &str = "Produto";

/// Renders retailer results as display strings ("R$ 29,90, R$ 31,50").
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    config: ReportConfig,
}

impl ReportFormatter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Two fraction digits, configured decimal marker, no grouping.
    pub fn format_price(&self, price: Decimal) -> String {
        let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        let amount = rounded.to_string().replace('.', &self.config.decimal_separator);
        format!("{} {}", self.config.currency_symbol, amount)
    }

    pub fn failure_label(&self, failure: &ExtractionFailure) -> &str {
        let labels = &self.config.labels;
        match failure {
            ExtractionFailure::NotFound => &labels.not_found,
            ExtractionFailure::Timeout => &labels.timed_out,
            ExtractionFailure::ParseError { .. } => &labels.parse_error,
            ExtractionFailure::Error { .. } => &labels.error,
        }
    }

    pub fn format_outcome(&self, outcome: &RetailerOutcome) -> String {
        match outcome {
            RetailerOutcome::EmptySearchTerm => self.config.labels.empty_search_term.clone(),
            RetailerOutcome::Extracted(Extraction::Failure(failure)) => {
                self.failure_label(failure).to_string()
            }
            RetailerOutcome::Extracted(Extraction::Prices(prices)) => {
                let mut sorted = prices.clone();
                sorted.sort();
                sorted
                    .into_iter()
                    .map(|price| self.format_price(price))
                    .collect::<Vec<_>>()
                    .join(&self.config.delimiter)
            }
        }
    }

    /// Retailer name to display string, in the order given.
    pub fn format(&self, results: &[RetailerResult]) -> Vec<(String, String)> {
        results
            .iter()
            .map(|result| (result.retailer.clone(), self.format_outcome(&result.outcome)))
            .collect()
    }

    pub fn row(&self, query: &ProductQuery, results: &[RetailerResult]) -> ReportRow {
        ReportRow {
            ean: query.identifier.clone(),
            product: query.display_term.clone(),
            prices: self.format(results),
        }
    }
}

/// One output line: identifier, product name and one field per retailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub ean: String,
    pub product: String,
    pub prices: Vec<(String, String)>,
}

impl ReportRow {
    pub fn get(&self, retailer: &str) -> Option<&str> {
        self.prices
            .iter()
            .find(|(name, _)| name == retailer)
            .map(|(_, value)| value.as_str())
    }
}

/// Rows in input order, all sharing the configured retailer columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    retailers: Vec<String>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new(retailers: Vec<String>) -> Self {
        Self {
            retailers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ReportRow) -> Result<()> {
        let columns: Vec<&str> = row.prices.iter().map(|(name, _)| name.as_str()).collect();
        if columns != self.retailers {
            return Err(AppError::Report(format!(
                "Row for EAN {} has retailer columns [{}], expected [{}]",
                row.ean,
                columns.join(", "),
                self.retailers.join(", ")
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> Vec<&str> {
        let mut headers = vec![EAN_COLUMN, PRODUCT_COLUMN];
        headers.extend(self.retailers.iter().map(String::as_str));
        headers
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.headers())?;
        for row in &self.rows {
            let mut record = vec![row.ean.as_str(), row.product.as_str()];
            record.extend(row.prices.iter().map(|(_, value)| value.as_str()));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        tracing::info!("Wrote {} row(s) to {}", self.rows.len(), path.display());
        Ok(())
    }
}
