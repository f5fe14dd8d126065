//! Application configuration (TOML).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{COINGECKO_API_URL, CRYPTOCOMPARE_API_URL, DEMO_WALLET, LIQUIDATION_THRESHOLD_PCT};
use crate::risk::{Classifier, ZeroDebtPolicy};
use crate::{prelude::*, Error};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub prices: PriceFeedConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Log file path (logs to both file and stdout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub zero_debt_policy: ZeroDebtPolicy,
    /// Ratio below which positions can be liquidated (percent)
    #[serde(default = "default_liquidation_threshold")]
    pub liquidation_threshold_pct: f64,
}

fn default_liquidation_threshold() -> f64 {
    LIQUIDATION_THRESHOLD_PCT
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            zero_debt_policy: ZeroDebtPolicy::default(),
            liquidation_threshold_pct: default_liquidation_threshold(),
        }
    }
}

impl ClassifierConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.zero_debt_policy)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PriceFeedConfig {
    /// Query live prices before reporting
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_primary_url")]
    pub primary_url: String,
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_primary_url() -> String {
    COINGECKO_API_URL.to_string()
}

fn default_fallback_url() -> String {
    CRYPTOCOMPARE_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            primary_url: default_primary_url(),
            fallback_url: default_fallback_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DataConfig {
    /// JSON ledger; the embedded demo ledger is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions_file: Option<PathBuf>,
    /// Owner id for the "my positions" view
    #[serde(default = "default_owner")]
    pub owner: String,
}

fn default_owner() -> String {
    DEMO_WALLET.to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            positions_file: None,
            owner: default_owner(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.classifier.liquidation_threshold_pct;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::Config(format!(
                "liquidation_threshold_pct must be positive, got {threshold}"
            )));
        }
        if self.prices.timeout_secs == 0 {
            return Err(Error::Config("prices.timeout_secs must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Sample config file with a header comment.
    pub fn sample_toml() -> Result<String> {
        let content = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(format!(
            r#"# ALUD positions report configuration
# See: positions_report --help
#
# classifier.zero_debt_policy: reject | very-safe | exclude

{content}
# Point at a JSON ledger instead of the built-in demo data:
# [data]
# positions_file = "positions.json"
"#
        ))
    }
}
