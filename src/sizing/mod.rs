//! Position sizing for market-neutral Yes/No arbitrage.
//!
//! Sizing runs in four stages:
//! - Validation: both prices in (0, 1) and summing below $1
//! - Constraint resolution: position cap vs. balance fraction, cap wins ties
//! - Quantization: whole pairs that fit under the binding ceiling
//! - Metrics: costs, payout, profit and margin in exact decimals
//!
//! [`opportunity`] is an independent pre-filter for scanning.

pub mod opportunity;
pub mod position;
pub mod quantize;
pub mod risk;
pub mod sizer;
pub mod validate;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Settlement value of the winning side, per contract.
pub const PAYOUT_PER_CONTRACT: Decimal = dec!(1.00);

pub use opportunity::{is_opportunity, pair_margin, DEFAULT_MIN_PROFIT_MARGIN};
pub use position::PositionSize;
pub use risk::{Ceiling, Constraint, RiskConfig};
pub use sizer::{PositionSizer, MIN_CONTRACTS};
pub use validate::validate_prices;
