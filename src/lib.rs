//! Position sizing for Yes/No prediction market arbitrage.
//!
//! When the best asks for both outcomes of a binary market sum to less than
//! $1.00, buying the same number of contracts on each side locks in a profit:
//! exactly one side pays $1.00 per contract at settlement.
//!
//! ```text
//! Yes ask:   $0.45
//! No ask:    $0.53
//! ─────────────────
//! Pair:      $0.98 < $1.00
//! Profit:    $0.02 per pair (2.04%)
//! ```
//!
//! The sizer decides how many pairs to buy under two limits: a fixed dollar
//! cap per trade and a fraction of the available balance.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Quote types
//! - [`sizing`]: Validation, constraint resolution, quantization and metrics
//! - [`scanner`]: Batch sizing of many quotes
//! - [`metrics`]: Counters and latency histograms

pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod scanner;
pub mod sizing;

pub use config::Config;
pub use error::{PriceError, Result, SizerError};
pub use market::PriceQuote;
pub use sizing::{Constraint, PositionSize, PositionSizer, RiskConfig};
