use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{OffsetDateTime, Time, UtcOffset};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::provider::{MarketDataProvider, ProviderError};
use crate::{CompanyInfo, HistoryRecord, ProviderId};

pub const YAHOO_API_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

const SUMMARY_MODULES: &str =
    "quoteType,price,summaryDetail,defaultKeyStatistics,financialData,assetProfile";

/// Error code Yahoo uses for unknown tickers.
const NOT_FOUND_CODE: &str = "Not Found";

// ============================================================================
// Yahoo session - cookie/crumb credential for quoteSummary
// ============================================================================

/// Holds the crumb token that quoteSummary requires.
///
/// The session cookie itself lives in the HTTP client's cookie store.
#[derive(Default)]
struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    async fn crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
        api_base: &str,
        cookie_url: &str,
        timeout_ms: u64,
    ) -> Result<String, ProviderError> {
        let mut crumb = self.crumb.lock().await;
        if let Some(value) = crumb.as_ref() {
            return Ok(value.clone());
        }

        // fc.yahoo.com answers 404 but still sets the session cookie
        let cookie_request = HttpRequest::get(cookie_url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            ProviderError::unavailable(format!("failed to fetch yahoo cookie: {}", e.message()))
        })?;

        let crumb_request = HttpRequest::get(format!("{api_base}/v1/test/getcrumb"))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(timeout_ms);
        let response = http_client.execute(crumb_request).await.map_err(|e| {
            ProviderError::unavailable(format!("failed to fetch yahoo crumb: {}", e.message()))
        })?;

        let body = response.body.trim();
        if response.status == 429 || body.to_ascii_lowercase().contains("too many requests") {
            return Err(ProviderError::rate_limited(
                "yahoo rate limited while fetching crumb",
            ));
        }
        if !response.is_success()
            || body.is_empty()
            || body.len() >= 100
            || body.contains(' ')
            || body.contains('<')
        {
            return Err(ProviderError::unavailable("failed to obtain yahoo crumb"));
        }

        *crumb = Some(body.to_owned());
        Ok(body.to_owned())
    }

    async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Market-data provider backed by Yahoo Finance chart and quoteSummary APIs.
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    api_base: String,
    cookie_url: String,
    timeout_ms: u64,
    session: YahooSession,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            api_base: YAHOO_API_BASE_URL.to_owned(),
            cookie_url: YAHOO_COOKIE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            session: YahooSession::default(),
        }
    }

    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        cookie_url: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self.cookie_url = cookie_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn get(&self, url: String) -> Result<HttpResponse, ProviderError> {
        debug!(provider = %ProviderId::Yahoo, %url, "calling yahoo api");
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        self.http_client
            .execute(request)
            .await
            .map_err(|e| ProviderError::unavailable(format!("yahoo transport error: {}", e.message())))
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<HistoryRecord>, ProviderError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&events=div,splits",
            self.api_base,
            urlencoding::encode(ticker),
            urlencoding::encode(period),
            urlencoding::encode(interval)
        );
        let response = self.get(url).await?;

        let chart = match serde_json::from_str::<YahooChartResponse>(&response.body) {
            Ok(parsed) => parsed.chart,
            Err(_) if !response.is_success() => {
                return Err(ProviderError::from_status(ProviderId::Yahoo, response.status));
            }
            Err(e) => {
                return Err(ProviderError::parse(format!(
                    "failed to parse yahoo chart: {e}"
                )));
            }
        };

        if let Some(error) = chart.error {
            if error.code == NOT_FOUND_CODE {
                return Ok(Vec::new());
            }
            return Err(ProviderError::upstream(error.description));
        }
        if !response.is_success() {
            return Err(ProviderError::from_status(ProviderId::Yahoo, response.status));
        }

        match chart.result.and_then(|results| results.into_iter().next()) {
            Some(result) => chart_records(result, is_intraday(interval)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_info(&self, ticker: &str) -> Result<CompanyInfo, ProviderError> {
        let crumb = self
            .session
            .crumb(
                &self.http_client,
                &self.api_base,
                &self.cookie_url,
                self.timeout_ms,
            )
            .await?;

        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            self.api_base,
            urlencoding::encode(ticker),
            SUMMARY_MODULES,
            urlencoding::encode(&crumb)
        );
        let response = self.get(url).await?;

        if response.status == 401 || response.status == 403 {
            warn!(status = response.status, "yahoo rejected the crumb");
            self.session.invalidate().await;
            return Err(ProviderError::unavailable(format!(
                "yahoo rejected the session (status {})",
                response.status
            )));
        }

        let summary = match serde_json::from_str::<YahooQuoteSummaryResponse>(&response.body) {
            Ok(parsed) => parsed.quote_summary,
            Err(_) if !response.is_success() => {
                return Err(ProviderError::from_status(ProviderId::Yahoo, response.status));
            }
            Err(e) => {
                return Err(ProviderError::parse(format!(
                    "failed to parse yahoo fundamentals: {e}"
                )));
            }
        };

        if let Some(error) = summary.error {
            if error.code == NOT_FOUND_CODE {
                return Ok(CompanyInfo::new());
            }
            return Err(ProviderError::upstream(error.description));
        }
        if !response.is_success() {
            return Err(ProviderError::from_status(ProviderId::Yahoo, response.status));
        }

        Ok(summary
            .result
            .and_then(|results| results.into_iter().next())
            .map(flatten_modules)
            .unwrap_or_default())
    }
}

impl MarketDataProvider for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(
        &'a self,
        ticker: &'a str,
        period: &'a str,
        interval: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryRecord>, ProviderError>> + Send + 'a>>
    {
        Box::pin(async move { self.fetch_history(ticker, period, interval).await })
    }

    fn info<'a>(
        &'a self,
        ticker: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyInfo, ProviderError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_info(ticker).await })
    }
}

/// Minute and hour bars carry a time of day; everything else is a date.
fn is_intraday(interval: &str) -> bool {
    interval.ends_with('m') || interval.ends_with('h')
}

fn chart_records(
    result: YahooChartResult,
    intraday: bool,
) -> Result<Vec<HistoryRecord>, ProviderError> {
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let offset = result
        .meta
        .and_then(|meta| meta.gmtoffset)
        .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
        .unwrap_or(UtcOffset::UTC);
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();
    let events = result.events.unwrap_or_default();

    let dividends: HashMap<i64, f64> = events
        .dividends
        .into_values()
        .map(|dividend| (dividend.date, dividend.amount))
        .collect();
    let splits: HashMap<i64, f64> = events
        .splits
        .into_values()
        .filter(|split| split.denominator != 0.0)
        .map(|split| (split.date, split.numerator / split.denominator))
        .collect();

    let mut records = Vec::with_capacity(timestamps.len());
    for (i, ts_value) in timestamps.into_iter().enumerate() {
        let open = column(&quote.open, i);
        let high = column(&quote.high, i);
        let low = column(&quote.low, i);
        let close = column(&quote.close, i);
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let utc = OffsetDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| ProviderError::parse(format!("invalid timestamp {ts_value}: {e}")))?;
        let local = utc.to_offset(offset);
        let timestamp = if intraday {
            local
        } else {
            local.replace_time(Time::MIDNIGHT)
        };

        records.push(HistoryRecord {
            timestamp,
            intraday,
            open,
            high,
            low,
            close,
            volume: quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok()),
            dividends: dividends.get(&ts_value).copied().unwrap_or(0.0),
            stock_splits: splits.get(&ts_value).copied().unwrap_or(0.0),
        });
    }

    Ok(records)
}

fn column(values: &[Option<f64>], index: usize) -> Option<f64> {
    values
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

/// Merge every quoteSummary module into one flat map.
fn flatten_modules(modules: Map<String, Value>) -> CompanyInfo {
    let mut info = CompanyInfo::new();
    for module in modules.into_values() {
        let Value::Object(fields) = module else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            let value = unwrap_value(value);
            let keep_existing = info.get(&key).is_some_and(|existing| !existing.is_null());
            if !keep_existing {
                info.insert(key, value);
            }
        }
    }
    info
}

/// Yahoo wraps numbers as `{"raw": 1.2, "fmt": "1.20"}` and missing values as `{}`.
fn unwrap_value(value: Value) -> Value {
    match value {
        Value::Object(mut wrapper) => {
            if let Some(raw) = wrapper.remove("raw") {
                raw
            } else if wrapper.is_empty() {
                Value::Null
            } else if let Some(fmt) = wrapper.remove("fmt") {
                fmt
            } else {
                Value::Object(wrapper)
            }
        }
        other => other,
    }
}

// Yahoo Finance API response structures
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    events: Option<YahooChartEvents>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartEvents {
    #[serde(default)]
    dividends: HashMap<String, YahooDividend>,
    #[serde(default)]
    splits: HashMap<String, YahooSplit>,
}

#[derive(Debug, Deserialize)]
struct YahooDividend {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct YahooSplit {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}
