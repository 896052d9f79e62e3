use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;

use crate::models::ProductQuery;
use crate::utils::error::{AppError, Result};

pub const EAN_COLUMN: &str = "ean";
pub const SEARCH_TERM_COLUMN: &str = "termo_mercado_livre";

#[derive(Debug, Deserialize)]
struct InputRecord {
    #[serde(rename = "ean", default)]
    ean: Option<String>,
    #[serde(rename = "termo_mercado_livre", default)]
    search_term: Option<String>,
}

/// Reads the product list, failing before any retailer is contacted when the
/// file or its required columns are missing.
pub fn load_products(path: &Path) -> Result<Vec<ProductQuery>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::InputNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let content = decode(&bytes);
    if matches!(content, Cow::Owned(_)) {
        tracing::warn!("{} is not valid UTF-8, read it as Latin-1", path.display());
    }

    let products = parse_products(&content)?;
    tracing::info!("Loaded {} product(s) from {}", products.len(), path.display());
    Ok(products)
}

/// UTF-8 first, then Latin-1 (every byte maps to the code point of the same value).
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

pub fn parse_products(content: &str) -> Result<Vec<ProductQuery>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = [EAN_COLUMN, SEARCH_TERM_COLUMN]
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns { columns: missing });
    }

    let mut products = Vec::new();
    for (index, result) in reader.deserialize::<InputRecord>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Line {}: unreadable row, skipping: {}", line, e);
                continue;
            }
        };

        let ean = record.ean.unwrap_or_default();
        if ean.is_empty() {
            tracing::warn!("Line {}: empty EAN, skipping", line);
            continue;
        }

        products.push(ProductQuery::new(ean, record.search_term.unwrap_or_default()));
    }

    Ok(products)
}
