use std::process::ExitCode;

use clap::Parser;
use quadfit::{logging, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match quadfit::run(&cli).await {
        Ok(summary) => {
            tracing::info!(
                symbol = %summary.series.symbol(),
                closes = summary.series.len(),
                charts = summary.charts.len(),
                "session complete"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
