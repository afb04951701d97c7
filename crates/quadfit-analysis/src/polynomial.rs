use std::fmt::{Display, Formatter};

/// Degree-2 polynomial `a·x² + b·x + c`.
///
/// Coefficients are ordered highest power first, matching the order the
/// optimizer's parameter vector uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub const fn from_coefficients([a, b, c]: [f64; 3]) -> Self {
        Self { a, b, c }
    }

    pub const fn coefficients(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    /// Evaluate at day indices `0..len`.
    pub fn evaluate_series(&self, len: usize) -> FittedSeries {
        FittedSeries((0..len).map(|day| self.evaluate(day as f64)).collect())
    }

    /// Second derivative, `2a`.
    pub fn curvature(&self) -> f64 {
        2.0 * self.a
    }
}

impl Display for Quadratic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = |v: f64| if v.is_sign_negative() { '-' } else { '+' };
        write!(
            f,
            "y = {:.6}x² {} {:.6}x {} {:.6}",
            self.a,
            sign(self.b),
            self.b.abs(),
            sign(self.c),
            self.c.abs()
        )
    }
}

/// Polynomial values aligned index-for-index with a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSeries(Vec<f64>);

impl FittedSeries {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(day_index, value)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.0
            .iter()
            .enumerate()
            .map(|(day, &value)| (day as f64, value))
            .collect()
    }

    /// Sum of squared differences against observed values of the same length.
    pub fn sum_squared_error(&self, observed: &[f64]) -> f64 {
        self.0
            .iter()
            .zip(observed)
            .map(|(fitted, actual)| (actual - fitted).powi(2))
            .sum()
    }
}
