//! Quote validation.

use rust_decimal::Decimal;

use super::PAYOUT_PER_CONTRACT;
use crate::error::PriceError;
use crate::market::Side;

/// Reject quotes that cannot represent an arbitrage.
///
/// Yes is checked before No, and the pair sum last.
pub fn validate_prices(yes_price: Decimal, no_price: Decimal) -> Result<(), PriceError> {
    check_side(Side::Yes, yes_price)?;
    check_side(Side::No, no_price)?;

    let total = yes_price + no_price;
    if total >= PAYOUT_PER_CONTRACT {
        return Err(PriceError::NoArbitrage {
            yes_price,
            no_price,
            total,
        });
    }

    Ok(())
}

fn check_side(side: Side, price: Decimal) -> Result<(), PriceError> {
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        return Err(PriceError::OutOfRange { side, price });
    }
    Ok(())
}
