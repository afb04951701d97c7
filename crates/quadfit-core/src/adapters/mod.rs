//! Provider adapters implementing [`crate::DataSource`].

mod yahoo;

pub use yahoo::{parse_chart, YahooAdapter, YAHOO_BASE_URL};
