//! Contract quantization.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Whole pairs affordable under `ceiling` at `cost_per_pair`.
///
/// Truncates toward zero, which equals floor here because both operands must
/// be positive; anything else yields zero. The result never costs more than
/// `ceiling`.
pub fn max_pairs(ceiling: Decimal, cost_per_pair: Decimal) -> u64 {
    if ceiling <= Decimal::ZERO || cost_per_pair <= Decimal::ZERO {
        return 0;
    }

    // overflow means far more than u64::MAX pairs fit
    let mut contracts = match ceiling.checked_div(cost_per_pair) {
        Some(ratio) => ratio.trunc().to_u64().unwrap_or(u64::MAX),
        None => u64::MAX,
    };

    // division rounds at 28 digits and can land on the next integer
    while contracts > 0 && Decimal::from(contracts) * cost_per_pair > ceiling {
        contracts -= 1;
    }

    contracts
}
