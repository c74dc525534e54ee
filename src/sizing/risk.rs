//! Risk limits and binding-ceiling resolution.

use rust_decimal::Decimal;
use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::error::ConfigError;

/// Which limit determined the final position size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Constraint {
    /// Fixed-dollar cap per trade.
    PositionCap,
    /// Fraction of the available balance.
    BalancePercent,
    /// Not even one pair is affordable under the binding limit.
    InsufficientFunds,
}

impl Constraint {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Immutable per-trade risk limits.
///
/// Fields are private so a constructed value always satisfies
/// `max_position_usd > 0` and `0 < max_balance_fraction <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskConfig {
    max_position_usd: Decimal,
    max_balance_fraction: Decimal,
}

impl RiskConfig {
    /// Validate and build risk limits.
    pub fn new(
        max_position_usd: Decimal,
        max_balance_fraction: Decimal,
    ) -> Result<Self, ConfigError> {
        if max_position_usd <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveCap(max_position_usd));
        }

        if max_balance_fraction <= Decimal::ZERO || max_balance_fraction > Decimal::ONE {
            return Err(ConfigError::FractionOutOfRange(max_balance_fraction));
        }

        Ok(Self {
            max_position_usd,
            max_balance_fraction,
        })
    }

    /// Absolute dollar ceiling per trade.
    pub fn max_position_usd(&self) -> Decimal {
        self.max_position_usd
    }

    /// Maximum fraction of the balance per trade.
    pub fn max_balance_fraction(&self) -> Decimal {
        self.max_balance_fraction
    }

    /// Ceiling implied by the balance, `None` if it overflows.
    pub fn balance_ceiling(&self, available_balance: Decimal) -> Option<Decimal> {
        available_balance.checked_mul(self.max_balance_fraction)
    }

    /// Resolve the smaller of the two ceilings. The cap wins ties.
    pub fn binding_ceiling(&self, available_balance: Decimal) -> Ceiling {
        let cap = self.max_position_usd;
        match self.balance_ceiling(available_balance) {
            Some(balance) if balance < cap => Ceiling {
                amount: balance,
                constraint: Constraint::BalancePercent,
            },
            _ => Ceiling {
                amount: cap,
                constraint: Constraint::PositionCap,
            },
        }
    }
}

/// The binding cost ceiling and the limit it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ceiling {
    /// Maximum total cost of the position.
    pub amount: Decimal,
    /// Limit that produced `amount`.
    pub constraint: Constraint,
}
