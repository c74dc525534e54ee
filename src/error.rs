//! Unified error types for the position sizer.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::market::Side;

/// Unified error type for the position sizer.
#[derive(Error, Debug)]
pub enum SizerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration values out of bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Quote cannot represent an arbitrage.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A quote that cannot be sized.
///
/// These are never retried: identical inputs always fail the same way, so the
/// caller needs fresh market data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// One side is outside the open interval (0, 1).
    #[error("{side} price must be between 0 and 1, got {price}")]
    OutOfRange {
        /// Offending side.
        side: Side,
        /// Offending price.
        price: Decimal,
    },

    /// The pair costs at least the $1 settlement value.
    #[error("no arbitrage opportunity: Yes ({yes_price}) + No ({no_price}) = {total} >= $1.00")]
    NoArbitrage {
        /// Yes ask price.
        yes_price: Decimal,
        /// No ask price.
        no_price: Decimal,
        /// Combined cost of one pair.
        total: Decimal,
    },
}

impl PriceError {
    /// Side that failed the range check, if the failure was side-specific.
    pub fn side(&self) -> Option<Side> {
        match self {
            PriceError::OutOfRange { side, .. } => Some(*side),
            PriceError::NoArbitrage { .. } => None,
        }
    }
}

/// Risk and scanning settings that fail validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Position cap must be strictly positive.
    #[error("max position size must be greater than 0, got {0}")]
    NonPositiveCap(Decimal),

    /// Balance fraction must lie in (0, 1].
    #[error("max balance fraction must be in (0, 1], got {0}")]
    FractionOutOfRange(Decimal),

    /// Spread thresholds are expressed in whole cents, at least one.
    #[error("{name} must be at least 1 cent, got {value}")]
    InvalidSpread {
        /// Setting name.
        name: &'static str,
        /// Configured value.
        value: u32,
    },

    /// Minimum margin cannot be negative.
    #[error("min profit margin must not be negative, got {0}")]
    InvalidMargin(Decimal),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SizerError>;
