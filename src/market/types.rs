//! Quote types for binary Yes/No prediction markets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Side of a binary market, as named in price errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Side {
    /// The outcome resolves true.
    Yes,
    /// The outcome resolves false.
    No,
}

/// Ask prices for both sides of one market, in dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Market identifier (slug or ticker), if known.
    #[serde(default)]
    pub market: Option<String>,
    /// Best ask for Yes.
    pub yes_price: Decimal,
    /// Best ask for No.
    pub no_price: Decimal,
    /// Crypto markets carry dynamic fees and need a wider spread.
    #[serde(default)]
    pub crypto: bool,
}

impl PriceQuote {
    /// Create an anonymous, non-crypto quote.
    pub fn new(yes_price: Decimal, no_price: Decimal) -> Self {
        Self {
            market: None,
            yes_price,
            no_price,
            crypto: false,
        }
    }

    /// Attach a market identifier.
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Flag the quote as a crypto market.
    pub fn crypto(mut self) -> Self {
        self.crypto = true;
        self
    }

    /// Cost of buying one Yes and one No contract.
    pub fn pair_cost(&self) -> Decimal {
        self.yes_price + self.no_price
    }

    /// Distance below the $1 settlement value (negative when the pair is overpriced).
    pub fn spread(&self) -> Decimal {
        Decimal::ONE - self.pair_cost()
    }

    /// Label for logs.
    pub fn label(&self) -> &str {
        self.market.as_deref().unwrap_or("-")
    }
}
