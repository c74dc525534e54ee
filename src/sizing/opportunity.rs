//! Cheap pre-filter for scanning quotes before full sizing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::PAYOUT_PER_CONTRACT;

/// Margin required when the caller does not supply one (0.1%).
pub const DEFAULT_MIN_PROFIT_MARGIN: Decimal = dec!(0.001);

/// Profit per pair and its margin over cost.
///
/// Margin is zero when the pair cost is not positive.
pub fn pair_margin(yes_price: Decimal, no_price: Decimal) -> (Decimal, Decimal) {
    let total_cost = yes_price + no_price;
    let profit = PAYOUT_PER_CONTRACT - total_cost;
    let margin = if total_cost > Decimal::ZERO {
        profit / total_cost
    } else {
        Decimal::ZERO
    };
    (profit, margin)
}

/// True if the pair pays more than it costs by at least `min_profit_margin`.
pub fn is_opportunity(yes_price: Decimal, no_price: Decimal, min_profit_margin: Decimal) -> bool {
    let (profit, margin) = pair_margin(yes_price, no_price);
    profit > Decimal::ZERO && margin >= min_profit_margin
}
