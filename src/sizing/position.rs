//! Sized positions and their derived metrics.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::risk::Constraint;
use super::PAYOUT_PER_CONTRACT;

/// Calculated position size for an arbitrage trade.
///
/// The same number of contracts is bought on each side, so exactly one side
/// pays `PAYOUT_PER_CONTRACT` per contract at settlement whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionSize {
    /// Contracts per side.
    pub contracts: u64,
    /// Price per Yes contract.
    pub yes_price: Decimal,
    /// Price per No contract.
    pub no_price: Decimal,
    /// Total cost of the Yes leg.
    pub yes_cost: Decimal,
    /// Total cost of the No leg.
    pub no_cost: Decimal,
    /// Combined cost of both legs.
    pub total_cost: Decimal,
    /// Payout at settlement ($1 per contract).
    pub expected_payout: Decimal,
    /// `expected_payout - total_cost`.
    pub expected_profit: Decimal,
    /// Profit as a fraction of cost (0 when nothing is bought).
    pub profit_margin: Decimal,
    /// Which limit determined the size.
    pub constraint_triggered: Constraint,
}

impl PositionSize {
    /// Derive costs, payout and margin for `contracts` pairs.
    pub fn new(
        contracts: u64,
        yes_price: Decimal,
        no_price: Decimal,
        constraint: Constraint,
    ) -> Self {
        let quantity = Decimal::from(contracts);

        let yes_cost = quantity * yes_price;
        let no_cost = quantity * no_price;
        let total_cost = yes_cost + no_cost;
        let expected_payout = quantity * PAYOUT_PER_CONTRACT;
        let expected_profit = expected_payout - total_cost;

        let profit_margin = if total_cost > Decimal::ZERO {
            expected_profit / total_cost
        } else {
            Decimal::ZERO
        };

        Self {
            contracts,
            yes_price,
            no_price,
            yes_cost,
            no_cost,
            total_cost,
            expected_payout,
            expected_profit,
            profit_margin,
            constraint_triggered: constraint,
        }
    }

    /// Zero-contract result for a balance that cannot cover one pair.
    pub fn insufficient_funds(yes_price: Decimal, no_price: Decimal) -> Self {
        Self::new(0, yes_price, no_price, Constraint::InsufficientFunds)
    }

    /// Worth placing: at least one contract and a positive profit.
    pub fn is_viable(&self) -> bool {
        self.contracts > 0 && self.expected_profit > Decimal::ZERO
    }
}

impl fmt::Display for PositionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PositionSize({} contracts, Yes@{}, No@{}, cost=${}, profit=${}, margin={:.2}%, limited_by={})",
            self.contracts,
            self.yes_price,
            self.no_price,
            self.total_cost,
            self.expected_profit,
            (self.profit_margin * Decimal::ONE_HUNDRED).round_dp(2),
            self.constraint_triggered,
        )
    }
}
