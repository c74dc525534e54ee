//! Application configuration loaded from environment variables.
//!
//! Settings are grouped by prefix: `TRADING_*` for risk limits and scan
//! thresholds, `APP_*` for the process itself.

use rust_decimal::Decimal;
use serde::Deserialize;
use strum::Display;

use crate::error::{ConfigError, Result};
use crate::sizing::RiskConfig;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Live trading.
    Production,
    /// Test runs.
    Testing,
}

/// Process-level settings (`APP_*`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application environment.
    #[serde(default)]
    pub environment: Environment,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output logs as JSON.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Risk limits and scan thresholds (`TRADING_*`).
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Maximum position size per market in USD.
    #[serde(default = "default_max_position")]
    pub max_position_size_usd: Decimal,

    /// Maximum fraction of balance per trade (0.02 = 2%).
    #[serde(default = "default_max_balance_percent")]
    pub max_balance_percent: Decimal,

    /// Minimum profit margin for the opportunity pre-filter.
    #[serde(default = "default_min_profit_margin")]
    pub min_profit_margin: Decimal,

    /// Minimum spread in cents to consider for arbitrage.
    #[serde(default = "default_min_spread_cents")]
    pub min_spread_cents: u32,

    /// Minimum spread for crypto markets (higher due to dynamic fees).
    #[serde(default = "default_crypto_min_spread_cents")]
    pub crypto_market_min_spread_cents: u32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_position_size_usd: default_max_position(),
            max_balance_percent: default_max_balance_percent(),
            min_profit_margin: default_min_profit_margin(),
            min_spread_cents: default_min_spread_cents(),
            crypto_market_min_spread_cents: default_crypto_min_spread_cents(),
        }
    }
}

impl TradingConfig {
    /// Check every setting is within bounds.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.risk_config()?;

        if self.min_spread_cents < 1 {
            return Err(ConfigError::InvalidSpread {
                name: "TRADING_MIN_SPREAD_CENTS",
                value: self.min_spread_cents,
            });
        }

        if self.crypto_market_min_spread_cents < 1 {
            return Err(ConfigError::InvalidSpread {
                name: "TRADING_CRYPTO_MARKET_MIN_SPREAD_CENTS",
                value: self.crypto_market_min_spread_cents,
            });
        }

        if self.min_profit_margin.is_sign_negative() {
            return Err(ConfigError::InvalidMargin(self.min_profit_margin));
        }

        Ok(())
    }

    /// Build the immutable risk limits used by the sizer.
    pub fn risk_config(&self) -> std::result::Result<RiskConfig, ConfigError> {
        RiskConfig::new(self.max_position_size_usd, self.max_balance_percent)
    }

    /// Minimum spread in dollars for a market.
    pub fn min_spread(&self, crypto: bool) -> Decimal {
        let cents = if crypto {
            self.crypto_market_min_spread_cents
        } else {
            self.min_spread_cents
        };
        Decimal::new(i64::from(cents), 2)
    }
}

/// Aggregated settings.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Process settings.
    pub app: AppConfig,
    /// Trading settings.
    pub trading: TradingConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_position() -> Decimal {
    Decimal::new(1000, 0) // $1000
}

fn default_max_balance_percent() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_min_profit_margin() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

fn default_min_spread_cents() -> u32 {
    2
}

fn default_crypto_min_spread_cents() -> u32 {
    4
}

impl Config {
    /// Load and validate configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from `(name, value)` pairs and validate it.
    ///
    /// Parse failures surface as [`SizerError::Config`](crate::SizerError::Config),
    /// out-of-bounds settings as [`SizerError::InvalidConfig`](crate::SizerError::InvalidConfig).
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let config = Self {
            app: envy::prefixed("APP_").from_iter(vars.clone())?,
            trading: envy::prefixed("TRADING_").from_iter(vars)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.trading.validate()
    }
}
