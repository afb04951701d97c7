//! Data source trait and request/error types.
//!
//! A [`DataSource`] turns a [`DailyBarsRequest`] into a [`PriceSeries`]. The
//! only failure callers are expected to recover from is a remote data error
//! (see [`SourceError::is_remote_data_error`]): the symbol is unknown or the
//! source could not serve it. Everything else is fatal.
//!
//! # Example
//!
//! ```rust,ignore
//! use quadfit_core::{DailyBarsRequest, DataSource, DateRange, Symbol, YahooAdapter};
//!
//! async fn fetch(today: time::Date) -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::new();
//!     let request = DailyBarsRequest::new(Symbol::parse("AAPL")?, DateRange::trailing_month(today));
//!     let series = adapter.daily_closes(request).await?;
//!     println!("{} closes for {}", series.len(), series.symbol());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DateRange, PriceSeries, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The source does not know the symbol or has no data for it.
    NotFound,
    /// The source could not be reached or answered with an error status.
    Unavailable,
    /// The request did not complete within its timeout budget.
    Timeout,
    /// The provider refused to serve the client (throttled or unauthorized).
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Symbol not recognized or source unreachable.
    pub const fn is_remote_data_error(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::NotFound | SourceErrorKind::Unavailable
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for daily history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBarsRequest {
    pub symbol: Symbol,
    pub range: DateRange,
}

impl DailyBarsRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self { symbol, range }
    }
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; the returned future borrows the
/// adapter for its lifetime.
pub trait DataSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the daily closing prices for `req.symbol` within `req.range`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The symbol is unknown or has no closes in the range (`NotFound`)
    /// - The provider is unreachable or answers with an error status (`Unavailable`)
    /// - The request times out (`Timeout`)
    /// - The provider refuses the client (`RateLimited`)
    /// - The response cannot be decoded (`Internal`)
    fn daily_closes<'a>(
        &'a self,
        req: DailyBarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_and_unavailable_are_remote_data_errors() {
        assert!(SourceError::not_found("x").is_remote_data_error());
        assert!(SourceError::unavailable("x").is_remote_data_error());
        assert!(!SourceError::timeout("x").is_remote_data_error());
        assert!(!SourceError::rate_limited("x").is_remote_data_error());
        assert!(!SourceError::invalid_request("x").is_remote_data_error());
        assert!(!SourceError::internal("x").is_remote_data_error());
    }

    #[test]
    fn display_includes_stable_code() {
        let error = SourceError::not_found("no data for ZZZZ");
        assert_eq!(error.to_string(), "no data for ZZZZ (source.not_found)");
    }
}
