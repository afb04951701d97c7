//! One analysis session, start to finish.
//!
//! ```text
//! resolve symbol ─▶ interpolate ─▶ chart 1 ─▶ window (blocks)
//!                ─▶ optimize    ─▶ chart 2 ─▶ window (blocks)
//! ```
//!
//! Each stage borrows the previous stage's output and returns a new value.
//! Charts are only written to disk when an output directory is configured.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use quadfit_analysis::{interpolate, optimize, Interpolation, Optimization};
use quadfit_core::{DataSource, DateRange, PriceSeries, Symbol};

use crate::cli::Cli;
use crate::error::CliError;
use crate::plot::{
    best_fit_chart, chart_path, interpolation_chart, Chart, ChartViewer, PlotError, PngWriter,
};
use crate::resolver::Resolver;

pub const CLOSE_HINT: &str = "Close the chart window (or press Esc) to continue.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub range: DateRange,
    pub max_attempts: Option<u32>,
    /// PNG files are written here when set.
    pub output_dir: Option<PathBuf>,
    pub show_windows: bool,
    pub size: (u32, u32),
}

impl SessionConfig {
    /// Session settings for `cli`, with the month ending on `today`.
    pub fn from_cli(cli: &Cli, today: time::Date) -> Self {
        Self {
            range: DateRange::trailing_month(today),
            max_attempts: cli.max_attempts,
            output_dir: cli.output_dir.clone(),
            show_windows: !cli.no_window,
            size: (cli.width, cli.height),
        }
    }
}

/// What a completed session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub series: PriceSeries,
    pub interpolation: Interpolation,
    pub optimization: Optimization,
    /// Saved PNG files; empty without an output directory.
    pub charts: Vec<PathBuf>,
}

pub async fn run_session<R, W>(
    config: &SessionConfig,
    source: &dyn DataSource,
    viewer: &dyn ChartViewer,
    input: &mut R,
    output: &mut W,
) -> Result<RunSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    if config.output_dir.is_none() && !config.show_windows {
        tracing::warn!("charts will be neither shown nor saved");
    }

    let series = Resolver::new(source, config.range)
        .with_max_attempts(config.max_attempts)
        .resolve(input, output)
        .await?;

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir).map_err(|source| PlotError::OutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    let mut charts = Vec::new();

    let interpolation = interpolate(&series)?;
    writeln!(output, "Interpolation: {}", interpolation.coefficients)?;
    let chart = interpolation_chart(&series, &interpolation.fitted);
    charts.extend(present(config, viewer, &chart, series.symbol(), "interpolation", output)?);

    let optimization = optimize(&series);
    writeln!(output, "Best fit: {}", optimization.coefficients)?;
    let chart = best_fit_chart(&series, &optimization.fitted);
    charts.extend(present(config, viewer, &chart, series.symbol(), "best_fit", output)?);

    Ok(RunSummary {
        series,
        interpolation,
        optimization,
        charts,
    })
}

/// Saves `chart` when configured, then shows it and waits for the window to close.
fn present<W: Write>(
    config: &SessionConfig,
    viewer: &dyn ChartViewer,
    chart: &Chart,
    symbol: &Symbol,
    kind: &str,
    output: &mut W,
) -> Result<Option<PathBuf>, CliError> {
    let saved = match &config.output_dir {
        Some(dir) => {
            let path = chart_path(dir, symbol, kind);
            PngWriter::new(config.size.0, config.size.1).write(chart, &path)?;
            writeln!(output, "Saved chart to {}", path.display())?;
            Some(path)
        }
        None => None,
    };

    if config.show_windows {
        writeln!(output, "{CLOSE_HINT}")?;
        output.flush()?;
        viewer.show(chart)?;
    }
    Ok(saved)
}
