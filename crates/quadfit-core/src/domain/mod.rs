//! # Domain Models
//!
//! Strongly-typed inputs and outputs of the data fetch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`DateRange`] | Inclusive calendar-day range, usually the trailing month |
//! | [`DailyClose`] | One trading day's closing price |
//! | [`PriceSeries`] | Non-empty chronological closes for one symbol |
//!
//! All types enforce their invariants at construction time:
//!
//! ```rust
//! use quadfit_core::{PriceSeries, Symbol, ValidationError};
//! use time::macros::date;
//!
//! let symbol = Symbol::parse("msft")?;
//! assert_eq!(symbol.as_str(), "MSFT");
//!
//! let empty = PriceSeries::from_values(symbol, date!(2024 - 01 - 02), &[]);
//! assert!(matches!(empty, Err(ValidationError::EmptySeries)));
//! # Ok::<(), ValidationError>(())
//! ```

mod date_range;
mod series;
mod symbol;

pub use date_range::DateRange;
pub use series::{DailyClose, PriceSeries};
pub use symbol::Symbol;
