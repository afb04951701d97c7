//! # quadfit core
//!
//! Domain types and market data access for the quadfit analysis tool.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance chart API) |
//! | [`data_source`] | Data source trait, request and error types |
//! | [`domain`] | Domain models (Symbol, DateRange, PriceSeries) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/test)   │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PriceSeries     │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures are classified so callers can decide what is recoverable:
//!
//! ```rust
//! use quadfit_core::{SourceError, SourceErrorKind};
//!
//! fn should_reprompt(error: &SourceError) -> bool {
//!     match error.kind() {
//!         SourceErrorKind::NotFound | SourceErrorKind::Unavailable => true,
//!         _ => false,
//!     }
//! }
//!
//! assert!(should_reprompt(&SourceError::not_found("unknown symbol")));
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;

pub use adapters::YahooAdapter;

pub use data_source::{DailyBarsRequest, DataSource, SourceError, SourceErrorKind};

pub use domain::{DailyClose, DateRange, PriceSeries, Symbol};

pub use error::ValidationError;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
