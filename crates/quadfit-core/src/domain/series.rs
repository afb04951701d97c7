use time::{Date, Duration};

use crate::{Symbol, ValidationError};

/// Closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: Date,
    pub close: f64,
}

impl DailyClose {
    pub fn new(date: Date, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "close" });
        }
        if close < 0.0 {
            return Err(ValidationError::NegativeValue { field: "close" });
        }
        Ok(Self { date, close })
    }
}

/// Chronological daily closes for a single symbol.
///
/// The day index of a close is its position in the series, so indices are
/// always zero-based and contiguous. A series is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: Symbol,
    closes: Vec<DailyClose>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, closes: Vec<DailyClose>) -> Result<Self, ValidationError> {
        if closes.is_empty() {
            return Err(ValidationError::EmptySeries);
        }
        Ok(Self { symbol, closes })
    }

    /// Build a series from raw closes on consecutive calendar days starting at `first_day`.
    pub fn from_values(
        symbol: Symbol,
        first_day: Date,
        values: &[f64],
    ) -> Result<Self, ValidationError> {
        let closes = values
            .iter()
            .enumerate()
            .map(|(index, &close)| DailyClose::new(first_day + Duration::days(index as i64), close))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(symbol, closes)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn closes(&self) -> &[DailyClose] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn close_values(&self) -> Vec<f64> {
        self.closes.iter().map(|day| day.close).collect()
    }

    /// `(day_index, close)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.closes
            .iter()
            .enumerate()
            .map(|(index, day)| (index as f64, day.close))
            .collect()
    }

    pub fn first_date(&self) -> Date {
        self.closes[0].date
    }

    pub fn last_date(&self) -> Date {
        self.closes[self.closes.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn rejects_empty_series() {
        let err = PriceSeries::new(symbol(), Vec::new()).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySeries);
    }

    #[test]
    fn points_use_dense_zero_based_indices() {
        let series =
            PriceSeries::from_values(symbol(), date!(2024 - 01 - 01), &[10.0, 11.5, 9.25])
                .expect("series");

        assert_eq!(series.points(), vec![(0.0, 10.0), (1.0, 11.5), (2.0, 9.25)]);
        assert_eq!(series.first_date(), date!(2024 - 01 - 01));
        assert_eq!(series.last_date(), date!(2024 - 01 - 03));
    }

    #[test]
    fn rejects_non_finite_and_negative_closes() {
        assert!(matches!(
            DailyClose::new(date!(2024 - 01 - 01), f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "close" })
        ));
        assert!(matches!(
            DailyClose::new(date!(2024 - 01 - 01), -1.0),
            Err(ValidationError::NegativeValue { field: "close" })
        ));
    }
}
