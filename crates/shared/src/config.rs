//! Application configuration management.

use serde::Deserialize;

use crate::types::{CurrencyCode, MAX_DECIMAL_PLACES};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Currency every stored amount is expressed in.
    #[serde(default = "default_baseline_currency")]
    pub baseline_currency: CurrencyCode,
    /// Exchange rate service configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Transaction store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Submission behavior.
    #[serde(default)]
    pub submission: SubmissionConfig,
}

fn default_baseline_currency() -> CurrencyCode {
    CurrencyCode::USD
}

/// Exchange rate service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the rate API (without the `/latest/{code}` suffix).
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a fetched rate stays cached.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached currency pairs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_rates_base_url() -> String {
    "https://api.exchangerate-api.com/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_cache_capacity() -> u64 {
    256
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Transaction store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the group/transaction backend.
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Submission behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Decimal places recorded amounts are rounded to, at most 28.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Allow at most one in-flight submission per group.
    #[serde(default = "default_serialize_per_group")]
    pub serialize_per_group: bool,
}

fn default_decimal_places() -> u32 {
    2
}

fn default_serialize_per_group() -> bool {
    true
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            serialize_per_group: default_serialize_per_group(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            baseline_currency: default_baseline_currency(),
            rates: RatesConfig::default(),
            store: StoreConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones win: `config/default`, `config/{RUN_MODE}`, then
    /// `DIVVY__SECTION__KEY` environment variables. A `.env` file is read first
    /// if present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails
    /// [`AppConfig::validate`].
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("DIVVY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the deserializer cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.submission.decimal_places > MAX_DECIMAL_PLACES {
            return Err(config::ConfigError::Message(format!(
                "submission.decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.submission.decimal_places
            )));
        }
        Ok(())
    }
}
