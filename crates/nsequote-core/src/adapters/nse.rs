use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::provider::{EquityProvider, ProviderError};
use crate::{ProviderId, Symbol};

pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

/// Underlyings whose option chains live under the index endpoint.
const INDEX_UNDERLYINGS: [&str; 5] = ["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "NIFTYNXT50"];

/// Equity provider backed by the NSE India public JSON API.
///
/// The API only answers clients holding the session cookies set by the
/// home page, so the first call visits it; the HTTP client's cookie store
/// keeps the cookies afterwards.
pub struct NseAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    session_ready: AtomicBool,
}

impl NseAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: NSE_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            session_ready: AtomicBool::new(false),
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

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("accept", "application/json, text/plain, */*")
            .with_header("accept-language", "en-US,en;q=0.9")
            .with_header("referer", format!("{}/", self.base_url))
            .with_timeout_ms(self.timeout_ms)
    }

    async fn ensure_session(&self) -> Result<(), ProviderError> {
        if self.session_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        debug!(provider = %ProviderId::Nse, "priming nse session cookies");
        let response = self
            .http_client
            .execute(self.request(self.base_url.clone()))
            .await
            .map_err(|e| {
                ProviderError::unavailable(format!("failed to open nse session: {}", e.message()))
            })?;

        if !response.is_success() {
            return Err(ProviderError::from_status(ProviderId::Nse, response.status));
        }

        self.session_ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn fetch_json(&self, path: &str, symbol: &Symbol) -> Result<Value, ProviderError> {
        self.ensure_session().await?;

        let url = format!(
            "{}{}symbol={}",
            self.base_url,
            path,
            urlencoding::encode(symbol.as_str())
        );
        debug!(provider = %ProviderId::Nse, %url, "calling nse api");

        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|e| ProviderError::unavailable(format!("nse transport error: {}", e.message())))?;

        self.parse_response(response)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Value, ProviderError> {
        match response.status {
            404 => return Ok(Value::Null),
            401 | 403 => {
                // cookies expired; the next call opens a fresh session
                self.session_ready.store(false, Ordering::Release);
                warn!(status = response.status, "nse rejected the session");
                return Err(ProviderError::unavailable(format!(
                    "nse rejected the session (status {})",
                    response.status
                )));
            }
            _ if !response.is_success() => {
                return Err(ProviderError::from_status(ProviderId::Nse, response.status));
            }
            _ => {}
        }

        let body = response.body.trim();
        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(body)
            .map_err(|e| ProviderError::parse(format!("failed to parse nse response: {e}")))
    }
}

fn option_chain_path(symbol: &Symbol) -> &'static str {
    if INDEX_UNDERLYINGS.contains(&symbol.as_str()) {
        "/api/option-chain-indices?"
    } else {
        "/api/option-chain-equities?"
    }
}

impl EquityProvider for NseAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nse
    }

    fn quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            self.fetch_json("/api/quote-equity?section=trade_info&", symbol)
                .await
        })
    }

    fn equity_details<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_json("/api/quote-equity?", symbol).await })
    }

    fn option_chain<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_json(option_chain_path(symbol), symbol).await })
    }
}
