//! Interactive ticker prompt.
//!
//! Keeps asking until a symbol yields a non-empty price series. Input that
//! does not parse as a symbol and remote-data errors (`NotFound`,
//! `Unavailable`) both print the invalid-symbol message and re-prompt; any
//! other fetch error ends the run.

use std::io::{BufRead, Write};

use quadfit_core::{DailyBarsRequest, DataSource, DateRange, PriceSeries, SourceError, Symbol};

use crate::error::CliError;

pub const PROMPT: &str = "Enter a valid stock symbol: ";

pub fn invalid_symbol_message(raw: &str) -> String {
    format!("Stock symbol \"{raw}\" is not valid")
}

/// Prompts on `output`, reads from `input`, fetches from `source`.
pub struct Resolver<'a> {
    source: &'a dyn DataSource,
    range: DateRange,
    max_attempts: Option<u32>,
}

enum Attempt {
    Resolved(PriceSeries),
    Invalid,
}

impl<'a> Resolver<'a> {
    pub fn new(source: &'a dyn DataSource, range: DateRange) -> Self {
        Self {
            source,
            range,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub async fn resolve<R, W>(&self, input: &mut R, output: &mut W) -> Result<PriceSeries, CliError>
    where
        R: BufRead,
        W: Write,
    {
        let mut failures = 0_u32;
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Err(CliError::InputClosed);
            }
            let raw = line.trim();

            match self.attempt(raw).await? {
                Attempt::Resolved(series) => return Ok(series),
                Attempt::Invalid => writeln!(output, "{}", invalid_symbol_message(raw))?,
            }

            failures += 1;
            if self.max_attempts.is_some_and(|max| failures >= max) {
                return Err(CliError::AttemptsExhausted { attempts: failures });
            }
        }
    }

    async fn attempt(&self, raw: &str) -> Result<Attempt, SourceError> {
        let symbol = match Symbol::parse(raw) {
            Ok(symbol) => symbol,
            Err(error) => {
                tracing::info!(input = raw, %error, "rejected stock symbol");
                return Ok(Attempt::Invalid);
            }
        };

        let request = DailyBarsRequest::new(symbol.clone(), self.range);
        match self.source.daily_closes(request).await {
            Ok(series) if !series.is_empty() => {
                tracing::info!(
                    %symbol,
                    source = self.source.name(),
                    closes = series.len(),
                    range = %self.range,
                    "resolved stock symbol"
                );
                Ok(Attempt::Resolved(series))
            }
            Ok(_) => {
                tracing::info!(%symbol, "no closes for stock symbol");
                Ok(Attempt::Invalid)
            }
            Err(error) if error.is_remote_data_error() => {
                tracing::info!(%symbol, %error, "stock symbol not usable");
                Ok(Attempt::Invalid)
            }
            Err(error) => Err(error),
        }
    }
}
