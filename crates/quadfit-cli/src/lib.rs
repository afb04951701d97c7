//! # quadfit
//!
//! Interactive front end: prompts for a ticker, fits the last month of
//! closes, and shows the two charts.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cli`] | Command-line flags |
//! | [`resolver`] | Ticker prompt and retry loop |
//! | [`pipeline`] | Session driver |
//! | [`plot`] | Chart model, PNG output and chart windows |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`error`] | CLI errors and exit codes |

pub mod cli;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod resolver;

use std::io;

use quadfit_core::YahooAdapter;
use time::OffsetDateTime;

pub use cli::Cli;
pub use error::CliError;
pub use pipeline::{run_session, RunSummary, SessionConfig};
pub use plot::{Chart, ChartViewer, PlotError, PngWriter, WindowViewer};
pub use resolver::Resolver;

/// Run an interactive session on stdin/stdout against Yahoo Finance.
pub async fn run(cli: &Cli) -> Result<RunSummary, CliError> {
    let today = OffsetDateTime::now_utc().date();
    let config = SessionConfig::from_cli(cli, today);
    let source = YahooAdapter::new().with_timeout_ms(cli.timeout_ms);
    let viewer = WindowViewer::new(cli.width, cli.height);

    tracing::debug!(
        range = %config.range,
        output_dir = ?config.output_dir,
        show_windows = config.show_windows,
        "starting session"
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_session(&config, &source, &viewer, &mut input, &mut output).await
}
