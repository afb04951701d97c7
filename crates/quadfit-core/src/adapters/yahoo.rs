use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::data_source::{DailyBarsRequest, DataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{DailyClose, PriceSeries, Symbol};

/// Public chart API host.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart adapter for daily history.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(YAHOO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Chart endpoint for one symbol's daily history over the request range.
    pub fn chart_endpoint(&self, req: &DailyBarsRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start_timestamp(),
            req.range.end_timestamp_exclusive(),
        )
    }

    async fn fetch_daily_closes(&self, req: &DailyBarsRequest) -> Result<PriceSeries, SourceError> {
        let endpoint = self.chart_endpoint(req);
        tracing::debug!(symbol = %req.symbol, range = %req.range, %endpoint, "requesting yahoo chart");

        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(format!("yahoo request timed out: {}", e.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if response.status == 404 {
            let detail = chart_error_description(&response.body)
                .unwrap_or_else(|| String::from("symbol not found"));
            return Err(SourceError::not_found(format!(
                "yahoo has no chart for {}: {detail}",
                req.symbol
            )));
        }

        if matches!(response.status, 401 | 403 | 429) {
            tracing::warn!(
                symbol = %req.symbol,
                status = response.status,
                "yahoo refused the request"
            );
            return Err(SourceError::rate_limited(format!(
                "yahoo refused the request with status {}",
                response.status
            )));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let series = parse_chart(&req.symbol, &response.body)?;
        tracing::debug!(symbol = %req.symbol, closes = series.len(), "parsed yahoo chart");
        Ok(series)
    }
}

impl DataSource for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn daily_closes<'a>(
        &'a self,
        req: DailyBarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_daily_closes(&req).await })
    }
}

/// Decode a chart payload into a price series.
///
/// Rows with a missing, negative or non-finite close are skipped. When two
/// rows fall on the same UTC date the later one wins.
pub fn parse_chart(symbol: &Symbol, body: &str) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        return Err(SourceError::not_found(format!(
            "yahoo chart error for {symbol}: {}",
            error.describe()
        )));
    }

    let result = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut days: Vec<DailyClose> = Vec::with_capacity(timestamps.len());
    for (ts_value, close) in timestamps.iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };

        let date = OffsetDateTime::from_unix_timestamp(*ts_value)
            .map_err(|e| SourceError::internal(format!("invalid timestamp {ts_value}: {e}")))?
            .date();

        let day = match DailyClose::new(date, close) {
            Ok(day) => day,
            Err(error) => {
                tracing::debug!(%symbol, %date, %error, "skipping unusable close");
                continue;
            }
        };

        match days.last_mut() {
            Some(last) if last.date == day.date => *last = day,
            _ => days.push(day),
        }
    }

    PriceSeries::new(symbol.clone(), days)
        .map_err(|_| SourceError::not_found(format!("no price data for {symbol}")))
}

fn chart_error_description(body: &str) -> Option<String> {
    serde_json::from_str::<YahooChartResponse>(body)
        .ok()
        .and_then(|response| response.chart.error)
        .map(|error| error.describe())
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl YahooChartError {
    fn describe(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{}: {description}", self.code)
            }
            _ => self.code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
