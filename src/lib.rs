pub mod config;
pub mod input;
pub mod item_matcher;
pub mod models;
pub mod pacing;
pub mod price_comparator;
pub mod price_extractor;
pub mod price_parser;
pub mod report;
pub mod runner;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::item_matcher::ItemMatcher;
pub use crate::models::{Extraction, ExtractionFailure, ProductQuery, RetailerResult, RetailerStrategy};
pub use crate::pacing::Pacer;
pub use crate::price_comparator::PriceComparator;
pub use crate::price_extractor::PriceExtractor;
pub use crate::price_parser::PriceNormalizer;
pub use crate::report::{ReportFormatter, ReportRow, ReportTable};
pub use crate::runner::run_comparison;
pub use crate::scraper::{ChromeRenderer, ItemFragment, PageRenderer};
pub use crate::utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
