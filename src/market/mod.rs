//! Market quote types consumed by the sizer.
//!
//! Prices arrive from exchange clients outside this crate; only their shape
//! lives here.

pub mod types;

pub use types::{PriceQuote, Side};
