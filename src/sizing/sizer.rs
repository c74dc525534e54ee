//! Market-neutral position sizer.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::opportunity::{is_opportunity, DEFAULT_MIN_PROFIT_MARGIN};
use super::position::PositionSize;
use super::quantize::max_pairs;
use super::risk::RiskConfig;
use super::validate::validate_prices;
use crate::config::TradingConfig;
use crate::error::{ConfigError, PriceError};
use crate::market::PriceQuote;

/// Smallest position worth returning as anything but insufficient funds.
pub const MIN_CONTRACTS: u64 = 1;

/// Sizes Yes/No pairs under a position cap and a balance-fraction cap.
///
/// Stateless apart from its immutable limits; copy it freely across threads.
///
/// ```
/// use arb_sizer::sizing::{PositionSizer, RiskConfig};
/// use rust_decimal_macros::dec;
///
/// let sizer = PositionSizer::new(RiskConfig::new(dec!(1000), dec!(0.02)).unwrap());
/// let position = sizer.calculate(dec!(0.45), dec!(0.53), dec!(10000)).unwrap();
/// assert_eq!(position.contracts, 204);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSizer {
    risk: RiskConfig,
}

impl PositionSizer {
    /// Create a sizer from validated risk limits.
    pub fn new(risk: RiskConfig) -> Self {
        Self { risk }
    }

    /// Create a sizer from loaded trading settings.
    pub fn from_config(config: &TradingConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.risk_config()?))
    }

    /// Risk limits in force.
    pub fn risk(&self) -> &RiskConfig {
        &self.risk
    }

    /// Size an arbitrage on a Yes/No pair.
    ///
    /// Fails only for quotes that cannot be an arbitrage. A balance too small
    /// for one pair returns a zero-contract position limited by
    /// `insufficient_funds`.
    #[instrument(level = "debug", skip(self))]
    pub fn calculate(
        &self,
        yes_price: Decimal,
        no_price: Decimal,
        available_balance: Decimal,
    ) -> Result<PositionSize, PriceError> {
        validate_prices(yes_price, no_price)?;

        let cost_per_pair = yes_price + no_price;
        let ceiling = self.risk.binding_ceiling(available_balance);
        let contracts = max_pairs(ceiling.amount, cost_per_pair);

        if contracts < MIN_CONTRACTS {
            warn!(
                max_cost = %ceiling.amount,
                min_required = %(cost_per_pair * Decimal::from(MIN_CONTRACTS)),
                constraint = %ceiling.constraint,
                "Insufficient funds for minimum position"
            );
            return Ok(PositionSize::insufficient_funds(yes_price, no_price));
        }

        let position = PositionSize::new(contracts, yes_price, no_price, ceiling.constraint);

        debug!(
            contracts,
            max_cost = %ceiling.amount,
            total_cost = %position.total_cost,
            constraint = %ceiling.constraint,
            "Position calculated"
        );

        Ok(position)
    }

    /// Size a quote.
    pub fn calculate_quote(
        &self,
        quote: &PriceQuote,
        available_balance: Decimal,
    ) -> Result<PositionSize, PriceError> {
        self.calculate(quote.yes_price, quote.no_price, available_balance)
    }

    /// Contracts per side, without the rest of the position.
    pub fn calculate_max_contracts(
        &self,
        yes_price: Decimal,
        no_price: Decimal,
        available_balance: Decimal,
    ) -> Result<u64, PriceError> {
        self.calculate(yes_price, no_price, available_balance)
            .map(|position| position.contracts)
    }

    /// Pre-filter: does the pair clear `min_profit_margin`?
    pub fn validate_opportunity(
        &self,
        yes_price: Decimal,
        no_price: Decimal,
        min_profit_margin: Decimal,
    ) -> bool {
        is_opportunity(yes_price, no_price, min_profit_margin)
    }

    /// Pre-filter with [`DEFAULT_MIN_PROFIT_MARGIN`].
    pub fn has_opportunity(&self, yes_price: Decimal, no_price: Decimal) -> bool {
        self.validate_opportunity(yes_price, no_price, DEFAULT_MIN_PROFIT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::Constraint;
    use rust_decimal_macros::dec;

    fn sizer() -> PositionSizer {
        PositionSizer::new(RiskConfig::new(dec!(1000), dec!(0.02)).unwrap())
    }

    #[test]
    fn from_config_uses_trading_limits() {
        let sizer = PositionSizer::from_config(&TradingConfig::default()).unwrap();
        assert_eq!(sizer.risk().max_position_usd(), dec!(1000));
        assert_eq!(sizer.risk().max_balance_fraction(), dec!(0.02));
    }

    #[test]
    fn from_config_rejects_invalid_limits() {
        let config = TradingConfig {
            max_balance_percent: dec!(0),
            ..TradingConfig::default()
        };
        assert!(PositionSizer::from_config(&config).is_err());
    }

    #[test]
    fn cap_triggers_with_high_balance() {
        let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(100000)).unwrap();

        assert_eq!(position.contracts, 1020);
        assert_eq!(position.total_cost, dec!(999.60));
        assert_eq!(position.constraint_triggered, Constraint::PositionCap);
    }

    #[test]
    fn balance_triggers_with_low_balance() {
        let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(500)).unwrap();

        assert_eq!(position.contracts, 10);
        assert_eq!(position.constraint_triggered, Constraint::BalancePercent);
    }

    #[test]
    fn insufficient_funds_is_not_an_error() {
        let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(10)).unwrap();

        assert_eq!(position.contracts, 0);
        assert_eq!(position.constraint_triggered, Constraint::InsufficientFunds);
        assert!(!position.is_viable());
    }

    #[test]
    fn negative_balance_is_insufficient_funds() {
        let position = sizer().calculate(dec!(0.45), dec!(0.53), dec!(-100)).unwrap();
        assert_eq!(position.constraint_triggered, Constraint::InsufficientFunds);
    }

    #[test]
    fn invalid_price_is_an_error() {
        let err = sizer()
            .calculate(dec!(0.50), dec!(0.52), dec!(100000))
            .unwrap_err();
        assert!(matches!(err, PriceError::NoArbitrage { .. }));
    }

    #[test]
    fn max_contracts_matches_calculate() {
        let sizer = sizer();
        assert_eq!(
            sizer.calculate_max_contracts(dec!(0.45), dec!(0.53), dec!(100000)),
            Ok(1020)
        );
        assert!(sizer
            .calculate_max_contracts(dec!(0), dec!(0.53), dec!(100000))
            .is_err());
    }

    #[test]
    fn quote_is_sized_like_prices() {
        let sizer = sizer();
        let quote = PriceQuote::new(dec!(0.30), dec!(0.68));

        assert_eq!(
            sizer.calculate_quote(&quote, dec!(100000)),
            sizer.calculate(dec!(0.30), dec!(0.68), dec!(100000))
        );
    }

    #[test]
    fn has_opportunity_uses_default_margin() {
        let sizer = sizer();
        assert!(sizer.has_opportunity(dec!(0.45), dec!(0.53)));
        // 0.0005 / 0.9995 is below 0.1%
        assert!(!sizer.has_opportunity(dec!(0.4995), dec!(0.50)));
    }
}
