//! # quadfit analysis
//!
//! Quadratic models of a daily closing-price series.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`interpolation`] | Closed-form degree-2 least-squares fit (SVD) |
//! | [`optimization`] | Iterative best fit from a fixed seed |
//! | [`least_squares`] | Levenberg–Marquardt solver |
//! | [`polynomial`] | `Quadratic` model and fitted values |
//! | [`error`] | Analysis errors |
//!
//! The day index `x = 0, 1, …, n-1` is the independent variable for both
//! fits, and every fitted series has exactly one value per close.
//!
//! ```rust
//! use quadfit_analysis::{interpolate, optimize};
//! use quadfit_core::{PriceSeries, Symbol};
//! use time::macros::date;
//!
//! let symbol = Symbol::parse("AAPL").unwrap();
//! let series = PriceSeries::from_values(symbol, date!(2024 - 06 - 03), &[190.0, 192.5, 191.0, 194.0])
//!     .unwrap();
//!
//! let interpolation = interpolate(&series).unwrap();
//! let best_fit = optimize(&series);
//!
//! assert_eq!(interpolation.fitted.len(), series.len());
//! assert_eq!(best_fit.fitted.len(), series.len());
//! ```

pub mod error;
pub mod interpolation;
pub mod least_squares;
pub mod optimization;
pub mod polynomial;

pub use error::{AnalysisError, Result};
pub use interpolation::{fit_quadratic, interpolate, Interpolation};
pub use least_squares::{LeastSquaresProblem, LevenbergMarquardt, SolverReport, Termination};
pub use optimization::{optimize, optimize_with, Optimization, QuadraticResiduals, INITIAL_GUESS};
pub use polynomial::{FittedSeries, Quadratic};
