//! Batch scanning of candidate quotes.
//!
//! Every quote is judged independently against the same balance. Quotes that
//! fail the pre-filter are dropped cheaply, invalid quotes are recorded as
//! rejections, and everything else is sized. A zero-contract position is a
//! normal entry, so one bad quote never stops a scan.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::config::TradingConfig;
use crate::error::Result;
use crate::metrics;
use crate::market::PriceQuote;
use crate::sizing::{pair_margin, PositionSize, PositionSizer};

/// Thresholds a quote must clear before it is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanFilter {
    /// Minimum `1 - (yes + no)` for ordinary markets.
    pub min_spread: Decimal,
    /// Minimum spread for crypto markets.
    pub crypto_min_spread: Decimal,
    /// Minimum profit margin over pair cost.
    pub min_profit_margin: Decimal,
}

impl ScanFilter {
    /// Build from trading settings.
    pub fn from_config(config: &TradingConfig) -> Self {
        Self {
            min_spread: config.min_spread(false),
            crypto_min_spread: config.min_spread(true),
            min_profit_margin: config.min_profit_margin,
        }
    }

    fn required_spread(&self, quote: &PriceQuote) -> Decimal {
        if quote.crypto {
            self.crypto_min_spread
        } else {
            self.min_spread
        }
    }
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::from_config(&TradingConfig::default())
    }
}

/// Why a quote was dropped before sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterReason {
    /// Spread below the market's minimum.
    Spread {
        /// Observed spread.
        spread: Decimal,
        /// Required spread.
        required: Decimal,
    },
    /// Margin below the configured minimum.
    Margin {
        /// Observed margin.
        margin: Decimal,
        /// Required margin.
        required: Decimal,
    },
}

impl FilterReason {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FilterReason::Spread { .. } => "spread",
            FilterReason::Margin { .. } => "margin",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::Spread { spread, required } => {
                write!(f, "spread {} below {}", spread, required)
            }
            FilterReason::Margin { margin, required } => {
                write!(f, "margin {:.4} below {}", margin, required)
            }
        }
    }
}

/// Result for one quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Passed the pre-filter and was sized (possibly to zero contracts).
    Sized {
        /// Sized position.
        position: PositionSize,
    },
    /// Dropped by the pre-filter.
    Filtered {
        /// Threshold that failed.
        reason: FilterReason,
    },
    /// Prices cannot form an arbitrage.
    Rejected {
        /// Validation message.
        reason: String,
    },
}

impl ScanOutcome {
    /// Sized position, if any.
    pub fn position(&self) -> Option<&PositionSize> {
        match self {
            ScanOutcome::Sized { position } => Some(position),
            _ => None,
        }
    }
}

/// One scanned quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// Position in the input.
    pub index: usize,
    /// Market identifier from the quote.
    pub market: Option<String>,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: ScanOutcome,
}

/// Outcome of a batch scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// When the scan ran.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Balance every quote was sized against.
    pub available_balance: Decimal,
    /// Per-quote results, in input order.
    pub entries: Vec<ScanEntry>,
    /// Quotes that were sized.
    pub sized: usize,
    /// Sized quotes that are worth placing.
    pub viable: usize,
    /// Quotes dropped by the pre-filter.
    pub filtered: usize,
    /// Quotes with invalid prices.
    pub rejected: usize,
}

impl ScanReport {
    /// Viable entry with the largest expected profit; the earliest wins ties.
    pub fn best(&self) -> Option<&ScanEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.position().is_some_and(PositionSize::is_viable))
            .fold(None, |best: Option<&ScanEntry>, entry| match best {
                Some(current) if profit(current) >= profit(entry) => Some(current),
                _ => Some(entry),
            })
    }

    /// Viable positions in input order.
    pub fn viable_positions(&self) -> impl Iterator<Item = &PositionSize> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.position())
            .filter(|position| position.is_viable())
    }
}

fn profit(entry: &ScanEntry) -> Decimal {
    entry
        .outcome
        .position()
        .map(|position| position.expected_profit)
        .unwrap_or_default()
}

/// Size one quote with limits taken from `config`.
///
/// Unlike [`scan`], a malformed quote is an error here: there is no batch to
/// continue with.
pub fn size_quote(
    config: &TradingConfig,
    quote: &PriceQuote,
    available_balance: Decimal,
) -> Result<PositionSize> {
    let sizer = PositionSizer::from_config(config)?;
    let start = Instant::now();
    let position = sizer.calculate_quote(quote, available_balance);
    metrics::record_sizing_latency(start);

    match position {
        Ok(position) => {
            metrics::inc_positions_sized(position.constraint_triggered);
            Ok(position)
        }
        Err(e) => {
            metrics::inc_invalid_prices();
            Err(e.into())
        }
    }
}

/// Read a JSON array of quotes from a file.
pub fn load_quotes(path: impl AsRef<Path>) -> Result<Vec<PriceQuote>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Size every quote against the same balance.
#[instrument(skip_all, fields(quotes = quotes.len(), balance = %available_balance))]
pub fn scan(
    sizer: &PositionSizer,
    quotes: &[PriceQuote],
    available_balance: Decimal,
    filter: &ScanFilter,
) -> ScanReport {
    let mut report = ScanReport {
        generated_at: OffsetDateTime::now_utc(),
        available_balance,
        entries: Vec::with_capacity(quotes.len()),
        sized: 0,
        viable: 0,
        filtered: 0,
        rejected: 0,
    };

    for (index, quote) in quotes.iter().enumerate() {
        let start = Instant::now();
        let outcome = evaluate(sizer, quote, available_balance, filter);
        metrics::record_sizing_latency(start);

        match &outcome {
            ScanOutcome::Sized { position } => {
                report.sized += 1;
                if position.is_viable() {
                    report.viable += 1;
                }
                metrics::inc_positions_sized(position.constraint_triggered);
            }
            ScanOutcome::Filtered { reason } => {
                report.filtered += 1;
                metrics::inc_quotes_filtered(reason.label());
                debug!(market = quote.label(), %reason, "Quote filtered");
            }
            ScanOutcome::Rejected { reason } => {
                report.rejected += 1;
                metrics::inc_invalid_prices();
                debug!(market = quote.label(), %reason, "Quote rejected");
            }
        }

        report.entries.push(ScanEntry {
            index,
            market: quote.market.clone(),
            outcome,
        });
    }

    info!(
        sized = report.sized,
        viable = report.viable,
        filtered = report.filtered,
        rejected = report.rejected,
        "Scan complete"
    );

    report
}

fn evaluate(
    sizer: &PositionSizer,
    quote: &PriceQuote,
    available_balance: Decimal,
    filter: &ScanFilter,
) -> ScanOutcome {
    let spread = quote.spread();
    let required = filter.required_spread(quote);
    if spread < required {
        return ScanOutcome::Filtered {
            reason: FilterReason::Spread { spread, required },
        };
    }

    if !sizer.validate_opportunity(quote.yes_price, quote.no_price, filter.min_profit_margin) {
        let (_, margin) = pair_margin(quote.yes_price, quote.no_price);
        return ScanOutcome::Filtered {
            reason: FilterReason::Margin {
                margin,
                required: filter.min_profit_margin,
            },
        };
    }

    match sizer.calculate_quote(quote, available_balance) {
        Ok(position) => ScanOutcome::Sized { position },
        Err(err) => ScanOutcome::Rejected {
            reason: err.to_string(),
        },
    }
}
