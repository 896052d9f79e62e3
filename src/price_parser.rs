use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::ExtractionFailure;

/// Turns locale-formatted price text ("R$ 1.234,56", "1,234.56", "99,90")
/// into a `Decimal`.
///
/// Commas and periods are both read as separators. With several separators,
/// the last one is the decimal point only if exactly two digits follow it;
/// otherwise all of them are thousands separators. A lone separator followed
/// by a three-digit group is also a thousands separator. Values needing more
/// than 28 significant digits are rejected rather than rounded.
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    strip_regex: Regex,
}

impl PriceNormalizer {
    pub fn new() -> Self {
        PriceNormalizer {
            strip_regex: Regex::new(r"[^0-9,.]").expect("price strip pattern is valid"),
        }
    }

    pub fn normalize(&self, text: &str) -> Result<Decimal, ExtractionFailure> {
        let cleaned = self.strip_regex.replace_all(text, "").replace(',', ".");
        let segments: Vec<&str> = cleaned.split('.').collect();

        let candidate = match segments.as_slice() {
            [whole, fraction] if is_thousands_group(whole, fraction) => format!("{whole}{fraction}"),
            [_] | [_, _] => cleaned.clone(),
            [leading @ .., cents] if cents.len() == 2 => format!("{}.{}", leading.concat(), cents),
            _ => segments.concat(),
        };

        parse_decimal(&candidate).ok_or_else(|| ExtractionFailure::ParseError {
            text: text.to_string(),
        })
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_thousands_group(whole: &str, fraction: &str) -> bool {
    fraction.len() == 3
        && (1..=3).contains(&whole.len())
        && !whole.trim_start_matches('0').is_empty()
}

fn parse_decimal(candidate: &str) -> Option<Decimal> {
    if !candidate.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let (whole, fraction) = candidate.split_once('.').unwrap_or((candidate, ""));
    if significant_digits(whole, fraction) > MAX_SIGNIFICANT_DIGITS {
        return None;
    }

    let canonical = match (whole, fraction) {
        (whole, "") => whole.to_string(),
        ("", fraction) => format!("0.{fraction}"),
        (whole, fraction) => format!("{whole}.{fraction}"),
    };

    Decimal::from_str(&canonical).ok()
}

/// `Decimal::from_str` rounds anything longer instead of failing.
const MAX_SIGNIFICANT_DIGITS: usize = 28;

fn significant_digits(whole: &str, fraction: &str) -> usize {
    let whole = whole.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    if whole.is_empty() {
        // Leading fraction zeros still count against the 28-digit scale.
        fraction.len()
    } else {
        whole.len() + fraction.len()
    }
}
