use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::models::RetailerStrategy;
use crate::pacing::MAX_PACING_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "RetailerStrategy::defaults")]
    pub retailers: Vec<RetailerStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_path: Option<String>,
    pub user_agent: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on waiting for a retailer's price elements to render.
    pub wait_timeout_secs: u64,
    /// Lowest prices kept per retailer.
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub enabled: bool,
    pub min_secs: f64,
    pub max_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub currency_symbol: String,
    pub decimal_separator: String,
    pub delimiter: String,
    pub labels: ReportLabels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub not_found: String,
    pub timed_out: String,
    pub parse_error: String,
    pub error: String,
    pub empty_search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also written to a daily-rolling file here.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            browser: BrowserConfig::default(),
            extraction: ExtractionConfig::default(),
            pacing: PacingConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
            retailers: RetailerStrategy::defaults(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ean_list.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("precos_produtos_comparacao.csv"),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            user_agent: None,
            window_width: 1920,
            window_height: 1080,
            idle_timeout_secs: 300,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 15,
            max_results: 3,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_secs: 2.0,
            max_secs: 5.0,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            decimal_separator: ",".to_string(),
            delimiter: ", ".to_string(),
            labels: ReportLabels::default(),
        }
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            not_found: "not found".to_string(),
            timed_out: "timed out".to_string(),
            parse_error: "parse error".to_string(),
            error: "error".to_string(),
            empty_search_term: "empty search term".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "ean-price-compare.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads built-in defaults, then `config/default` (or `path`), then
    /// `PRECOS__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config/default").required(false),
        };

        let s = Config::builder()
            .add_source(file_source)
            // Add environment variables with prefix "PRECOS"
            .add_source(
                Environment::with_prefix("PRECOS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.wait_timeout_secs == 0 {
            return Err(ConfigError::Message("Extraction wait_timeout_secs must be greater than 0".into()));
        }

        if self.extraction.max_results == 0 {
            return Err(ConfigError::Message("Extraction max_results must be greater than 0".into()));
        }

        if !(self.pacing.min_secs.is_finite() && self.pacing.max_secs.is_finite())
            || self.pacing.min_secs < 0.0
        {
            return Err(ConfigError::Message("Pacing bounds must be finite and non-negative".into()));
        }

        if self.pacing.max_secs > MAX_PACING_SECS {
            return Err(ConfigError::Message(format!(
                "Pacing max_secs cannot exceed {} seconds",
                MAX_PACING_SECS
            )));
        }

        if self.pacing.min_secs > self.pacing.max_secs {
            return Err(ConfigError::Message("Pacing min_secs cannot exceed max_secs".into()));
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::Message("Browser window size must be greater than 0".into()));
        }

        if self.retailers.is_empty() {
            return Err(ConfigError::Message("At least one retailer must be configured".into()));
        }

        let mut names = HashSet::new();
        for retailer in &self.retailers {
            if !names.insert(retailer.name.as_str()) {
                return Err(ConfigError::Message(format!("Duplicate retailer name '{}'", retailer.name)));
            }
            retailer.validate().map_err(ConfigError::Message)?;
        }

        Ok(())
    }

    pub fn retailer_names(&self) -> Vec<String> {
        self.retailers.iter().map(|r| r.name.clone()).collect()
    }
}
