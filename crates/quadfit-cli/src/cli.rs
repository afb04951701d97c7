//! CLI argument definitions for quadfit.
//!
//! Running `quadfit` with no flags is the plain interactive session: prompt
//! for a ticker until one has data, then show the two charts one after the
//! other, each in a window that must be closed before the run continues.
//! Nothing is written to disk unless `--output-dir` is given.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--output-dir` | none | Also save both charts as PNGs in this directory |
//! | `--timeout-ms` | `10000` | HTTP request timeout in ms |
//! | `--max-attempts` | unbounded | Stop after this many invalid symbols |
//! | `--no-window` | `false` | Do not open chart windows |
//! | `--width` / `--height` | `1024` / `768` | Chart size in pixels |
//!
//! # Examples
//!
//! ```bash
//! # Interactive session
//! quadfit
//!
//! # Show the charts and keep PNG copies in ./out
//! quadfit --output-dir out
//!
//! # Headless scripted run, give up after 3 bad symbols
//! echo AAPL | quadfit --output-dir out --no-window --max-attempts 3
//!
//! # Verbose logging
//! RUST_LOG=quadfit=debug,quadfit_core=debug quadfit
//! ```

use std::path::PathBuf;

use clap::Parser;
use quadfit_core::http_client::DEFAULT_TIMEOUT_MS;

/// Fit a quadratic to a month of closing prices and chart it.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "quadfit",
    author,
    version,
    about = "Fit quadratics to a month of daily stock closes",
    long_about = "quadfit asks for a stock symbol, downloads the last month of daily \
closing prices, and fits a degree-2 polynomial to them twice:\n\
\n\
  • directly, as a least-squares polynomial interpolation\n\
  • iteratively, with a Levenberg-Marquardt solver seeded at (1, 2, 3)\n\
\n\
Each fit is drawn against the raw closes and shown in its own window; \
close it to continue. Pass --output-dir to keep PNG copies."
)]
pub struct Cli {
    /// Also save the chart PNGs in this directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Request timeout budget in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Stop after this many invalid symbols instead of prompting forever.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Do not open chart windows (for headless or scripted runs).
    #[arg(long, default_value_t = false)]
    pub no_window: bool,

    /// Chart width in pixels.
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u32).range(200..))]
    pub width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 768, value_parser = clap::value_parser!(u32).range(150..))]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_interactive() {
        let cli = Cli::try_parse_from(["quadfit"]).expect("defaults should parse");

        assert_eq!(cli.output_dir, None);
        assert_eq!(cli.timeout_ms, 10_000);
        assert_eq!(cli.max_attempts, None);
        assert!(!cli.no_window);
        assert_eq!((cli.width, cli.height), (1024, 768));
    }

    #[test]
    fn parses_scripted_run_flags() {
        let cli = Cli::try_parse_from([
            "quadfit",
            "--output-dir",
            "charts",
            "--timeout-ms",
            "2500",
            "--max-attempts",
            "3",
            "--no-window",
        ])
        .expect("flags should parse");

        assert_eq!(cli.output_dir, Some(PathBuf::from("charts")));
        assert_eq!(cli.timeout_ms, 2500);
        assert_eq!(cli.max_attempts, Some(3));
        assert!(cli.no_window);
    }

    #[test]
    fn rejects_zero_attempts() {
        assert!(Cli::try_parse_from(["quadfit", "--max-attempts", "0"]).is_err());
    }
}
