//! Chart model, rendering and display.
//!
//! A [`Chart`] is plain data: axis labels plus an ordered list of layers.
//! The two charts a run produces are built by [`interpolation_chart`] and
//! [`best_fit_chart`]; geometry such as axis ranges, legend placement and
//! error-bar spans is computed here without touching a drawing backend.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | `plotters` drawing into a PNG file or an RGB buffer |
//! | [`window`] | Desktop window that blocks until the chart is closed |

pub mod render;
pub mod window;

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::style::{RGBColor, BLACK, BLUE, RED};
use quadfit_analysis::FittedSeries;
use quadfit_core::{PriceSeries, Symbol};
use thiserror::Error;

pub use render::{render_rgb, rgb_to_0rgb, PngWriter};
pub use window::WindowViewer;

/// Relative size of the error bars on the best-fit chart.
pub const ERROR_BAR_FRACTION: f64 = 0.01;

/// Most x ticks drawn; longer series get a coarser step.
pub const MAX_X_LABELS: usize = 16;

const RANGE_PADDING: f64 = 0.05;
const LEGEND_WIDTH: f64 = 0.4;
const LEGEND_HEIGHT: f64 = 0.25;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("chart \"{0}\" has no data")]
    Empty(String),

    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to draw {target}: {message}")]
    Drawing { target: String, message: String },

    #[error("chart window failed: {0}")]
    Window(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotColor {
    Red,
    Blue,
    Black,
}

impl PlotColor {
    pub(crate) fn rgb(self) -> RGBColor {
        match self {
            Self::Red => RED,
            Self::Blue => BLUE,
            Self::Black => BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Diamond,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Vertical bar `low..=high` around `value` at `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBarSpan {
    pub x: f64,
    pub low: f64,
    pub value: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line {
        label: String,
        points: Vec<(f64, f64)>,
        color: PlotColor,
        width: u32,
        style: LineStyle,
    },
    Markers {
        label: String,
        points: Vec<(f64, f64)>,
        color: PlotColor,
        shape: MarkerShape,
        error_bars: Vec<ErrorBarSpan>,
    },
}

impl Layer {
    pub fn label(&self) -> &str {
        match self {
            Self::Line { label, .. } | Self::Markers { label, .. } => label,
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            Self::Line { points, .. } | Self::Markers { points, .. } => points,
        }
    }

    fn y_values(&self) -> impl Iterator<Item = f64> + '_ {
        let bars: &[ErrorBarSpan] = match self {
            Self::Markers { error_bars, .. } => error_bars,
            Self::Line { .. } => &[],
        };
        self.points()
            .iter()
            .map(|&(_, y)| y)
            .chain(bars.iter().flat_map(|bar| [bar.low, bar.high]))
    }

    /// Plotted points plus both ends of every error bar.
    fn occupied(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let bars: &[ErrorBarSpan] = match self {
            Self::Markers { error_bars, .. } => error_bars,
            Self::Line { .. } => &[],
        };
        self.points()
            .iter()
            .copied()
            .chain(bars.iter().flat_map(|bar| [(bar.x, bar.low), (bar.x, bar.high)]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub layers: Vec<Layer>,
}

impl Chart {
    pub fn layer(&self, label: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.label() == label)
    }

    /// Every x with half a day of room on both sides.
    pub fn x_range(&self) -> Range<f64> {
        let (min, max) = min_max(
            self.layers
                .iter()
                .flat_map(|layer| layer.points().iter().map(|&(x, _)| x)),
        )
        .unwrap_or((0.0, 0.0));
        (min - 0.5)..(max + 0.5)
    }

    /// Every plotted y, including error-bar ends, padded by 5 %.
    pub fn y_range(&self) -> Range<f64> {
        let (min, max) =
            min_max(self.layers.iter().flat_map(Layer::y_values)).unwrap_or((0.0, 1.0));
        let span = max - min;
        let padding = if span > 0.0 {
            span * RANGE_PADDING
        } else {
            (max.abs() * RANGE_PADDING).max(1.0)
        };
        (min - padding)..(max + padding)
    }

    /// The legend corner covering the fewest plotted points, ties going to
    /// the earlier corner in [`LegendCorner::PREFERENCE`].
    pub fn legend_corner(&self) -> LegendCorner {
        let (x_range, y_range) = (self.x_range(), self.y_range());
        let occupied: Vec<(f64, f64)> = self.layers.iter().flat_map(Layer::occupied).collect();
        LegendCorner::PREFERENCE
            .into_iter()
            .min_by_key(|corner| {
                occupied
                    .iter()
                    .filter(|&&point| corner.covers(point, &x_range, &y_range))
                    .count()
            })
            .unwrap_or(LegendCorner::LowerRight)
    }

    /// One x tick per day, up to [`MAX_X_LABELS`].
    pub fn x_label_count(&self) -> usize {
        let x = self.x_range();
        ((x.end - x.start).round() as usize).clamp(2, MAX_X_LABELS)
    }

    fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| layer.points().is_empty())
    }
}

/// Where the legend box sits inside the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    LowerRight,
    UpperLeft,
    UpperRight,
    LowerLeft,
}

impl LegendCorner {
    pub const PREFERENCE: [Self; 4] = [
        Self::LowerRight,
        Self::UpperLeft,
        Self::UpperRight,
        Self::LowerLeft,
    ];

    fn covers(self, (x, y): (f64, f64), x_range: &Range<f64>, y_range: &Range<f64>) -> bool {
        let x_edge = (x_range.end - x_range.start) * LEGEND_WIDTH;
        let y_edge = (y_range.end - y_range.start) * LEGEND_HEIGHT;
        let left = x <= x_range.start + x_edge;
        let right = x >= x_range.end - x_edge;
        let lower = y <= y_range.start + y_edge;
        let upper = y >= y_range.end - y_edge;
        match self {
            Self::LowerRight => lower && right,
            Self::UpperLeft => upper && left,
            Self::UpperRight => upper && right,
            Self::LowerLeft => lower && left,
        }
    }
}

/// Day-number tick text; fractional ticks stay blank.
pub fn day_label(value: &f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value + 0.0)
    } else {
        String::new()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Symmetric bars of `fraction` of each value.
pub fn error_bars(points: &[(f64, f64)], fraction: f64) -> Vec<ErrorBarSpan> {
    points
        .iter()
        .map(|&(x, value)| {
            let delta = (value * fraction).abs();
            ErrorBarSpan {
                x,
                low: value - delta,
                value,
                high: value + delta,
            }
        })
        .collect()
}

/// Raw closes as red diamonds under the blue interpolated curve.
pub fn interpolation_chart(series: &PriceSeries, fitted: &FittedSeries) -> Chart {
    Chart {
        title: format!("{} closing prices: interpolation", series.symbol()),
        x_label: String::from("Day number"),
        y_label: String::from("Stock Price"),
        layers: vec![
            Layer::Line {
                label: String::from("Interpolation Quadratic Line"),
                points: fitted.points(),
                color: PlotColor::Blue,
                width: 1,
                style: LineStyle::Solid,
            },
            Layer::Markers {
                label: String::from("Original Data"),
                points: series.points(),
                color: PlotColor::Red,
                shape: MarkerShape::Diamond,
                error_bars: Vec::new(),
            },
        ],
    }
}

/// Raw closes with 1 % error bars under the dashed best-fit curve.
pub fn best_fit_chart(series: &PriceSeries, fitted: &FittedSeries) -> Chart {
    let points = series.points();
    let error_bars = error_bars(&points, ERROR_BAR_FRACTION);
    Chart {
        title: format!("{} closing prices: best fit", series.symbol()),
        x_label: String::from("Day number"),
        y_label: String::from("Stock Price"),
        layers: vec![
            Layer::Markers {
                label: String::from("Original Data Points"),
                points,
                color: PlotColor::Black,
                shape: MarkerShape::Circle,
                error_bars,
            },
            Layer::Line {
                label: String::from("Best Fit"),
                points: fitted.points(),
                color: PlotColor::Blue,
                width: 2,
                style: LineStyle::Dashed,
            },
        ],
    }
}

pub fn chart_path(output_dir: &Path, symbol: &Symbol, kind: &str) -> PathBuf {
    output_dir.join(format!("{symbol}_{kind}.png"))
}

/// Shows a [`Chart`] and returns once the user has dismissed it.
pub trait ChartViewer {
    fn show(&self, chart: &Chart) -> Result<(), PlotError>;
}

#[cfg(test)]
mod tests {
    use quadfit_analysis::Quadratic;
    use time::macros::date;

    use super::*;

    fn series(values: &[f64]) -> PriceSeries {
        PriceSeries::from_values(
            Symbol::parse("MSFT").expect("symbol"),
            date!(2024 - 04 - 01),
            values,
        )
        .expect("series")
    }

    #[test]
    fn error_bars_are_one_percent_each_side() {
        let bars = error_bars(&[(0.0, 200.0), (1.0, 50.0)], ERROR_BAR_FRACTION);

        assert_eq!(bars.len(), 2);
        assert!((bars[0].low - 198.0).abs() < 1e-9);
        assert!((bars[0].high - 202.0).abs() < 1e-9);
        assert!((bars[1].low - 49.5).abs() < 1e-9);
        assert!((bars[1].high - 50.5).abs() < 1e-9);
        assert_eq!(bars[1].value, 50.0);
    }

    #[test]
    fn interpolation_chart_labels_match_legend() {
        let series = series(&[10.0, 11.0, 10.5]);
        let fitted = Quadratic::new(0.0, 0.25, 10.25).evaluate_series(series.len());

        let chart = interpolation_chart(&series, &fitted);

        assert_eq!(chart.x_label, "Day number");
        assert_eq!(chart.y_label, "Stock Price");
        assert!(matches!(
            chart.layer("Interpolation Quadratic Line"),
            Some(Layer::Line { color: PlotColor::Blue, style: LineStyle::Solid, .. })
        ));
        assert!(matches!(
            chart.layer("Original Data"),
            Some(Layer::Markers { color: PlotColor::Red, shape: MarkerShape::Diamond, .. })
        ));
    }

    #[test]
    fn best_fit_chart_has_error_bars_and_dashed_line() {
        let series = series(&[100.0, 102.0, 101.0, 103.0]);
        let fitted = Quadratic::new(0.0, 0.8, 100.3).evaluate_series(series.len());

        let chart = best_fit_chart(&series, &fitted);

        match chart.layer("Original Data Points") {
            Some(Layer::Markers {
                error_bars,
                shape,
                color,
                ..
            }) => {
                assert_eq!(error_bars.len(), 4);
                assert_eq!(*shape, MarkerShape::Circle);
                assert_eq!(*color, PlotColor::Black);
            }
            other => panic!("unexpected layer: {other:?}"),
        }
        assert!(matches!(
            chart.layer("Best Fit"),
            Some(Layer::Line { width: 2, style: LineStyle::Dashed, .. })
        ));
    }

    #[test]
    fn ranges_cover_points_and_error_bars() {
        let series = series(&[100.0, 110.0]);
        let fitted = Quadratic::new(0.0, 10.0, 100.0).evaluate_series(2);
        let chart = best_fit_chart(&series, &fitted);

        let x = chart.x_range();
        assert_eq!(x, -0.5..1.5);

        let y = chart.y_range();
        // Bars reach 99.0 and 111.1; padding is 5 % of that span.
        let span = 111.1 - 99.0;
        assert!((y.start - (99.0 - span * 0.05)).abs() < 1e-9);
        assert!((y.end - (111.1 + span * 0.05)).abs() < 1e-9);
    }

    #[test]
    fn flat_series_still_gets_a_y_range() {
        let series = series(&[0.0]);
        let fitted = Quadratic::new(0.0, 0.0, 0.0).evaluate_series(1);

        let y = interpolation_chart(&series, &fitted).y_range();

        assert!(y.start < 0.0 && y.end > 0.0);
    }

    #[test]
    fn chart_files_are_named_by_symbol() {
        let symbol = Symbol::parse("aapl").expect("symbol");
        assert_eq!(
            chart_path(Path::new("out"), &symbol, "best_fit"),
            PathBuf::from("out/AAPL_best_fit.png")
        );
    }

    fn line_chart(points: Vec<(f64, f64)>) -> Chart {
        Chart {
            title: String::from("line"),
            x_label: String::new(),
            y_label: String::new(),
            layers: vec![Layer::Markers {
                label: String::from("points"),
                points,
                color: PlotColor::Black,
                shape: MarkerShape::Circle,
                error_bars: Vec::new(),
            }],
        }
    }

    #[test]
    fn rising_prices_put_the_legend_lower_right() {
        let chart = line_chart((0..=10).map(|day| (day as f64, day as f64)).collect());

        assert_eq!(chart.legend_corner(), LegendCorner::LowerRight);
    }

    #[test]
    fn falling_prices_move_the_legend_off_the_data() {
        let chart = line_chart((0..=10).map(|day| (day as f64, 10.0 - day as f64)).collect());

        let corner = chart.legend_corner();

        assert_eq!(corner, LegendCorner::UpperRight);
        let (x, y) = (chart.x_range(), chart.y_range());
        assert!(chart.layers[0]
            .points()
            .iter()
            .all(|&point| !corner.covers(point, &x, &y)));
    }

    #[test]
    fn error_bar_ends_count_as_occupied() {
        let mut chart = line_chart(vec![(0.0, 0.0), (10.0, 10.0)]);
        if let Layer::Markers { error_bars, .. } = &mut chart.layers[0] {
            *error_bars = vec![ErrorBarSpan {
                x: 10.0,
                low: 0.0,
                value: 10.0,
                high: 10.0,
            }];
        }

        assert_ne!(chart.legend_corner(), LegendCorner::LowerRight);
    }

    #[test]
    fn day_labels_are_whole_numbers() {
        assert_eq!(day_label(&0.0), "0");
        assert_eq!(day_label(&-0.0), "0");
        assert_eq!(day_label(&14.0), "14");
        assert_eq!(day_label(&2.5), "");
        assert_eq!(day_label(&-0.5), "");
    }

    #[test]
    fn x_labels_follow_the_day_count() {
        let month = line_chart((0..21).map(|day| (day as f64, 1.0)).collect());
        let single = line_chart(vec![(0.0, 1.0)]);

        assert_eq!(month.x_label_count(), MAX_X_LABELS);
        assert_eq!(single.x_label_count(), 2);
        assert_eq!(line_chart((0..8).map(|day| (day as f64, 1.0)).collect()).x_label_count(), 8);
    }
}
