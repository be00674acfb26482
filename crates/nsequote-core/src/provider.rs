//! Provider traits and the error type shared by every adapter.
//!
//! Two capability groups are modeled:
//!
//! | Trait | Operations | Concrete adapter |
//! |-------|------------|------------------|
//! | [`EquityProvider`] | quote, equity details, option chain | [`NseAdapter`](crate::NseAdapter) |
//! | [`MarketDataProvider`] | price history, company info | [`YahooAdapter`](crate::YahooAdapter) |
//!
//! Adapters are opaque to the request handlers: every call may be slow and
//! may fail, results are never cached and failed calls are never retried.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::{CompanyInfo, HistoryRecord, ProviderId, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Unavailable,
    RateLimited,
    Parse,
    Upstream,
}

/// Fault raised by a provider call.
///
/// `Display` renders the bare message; it is what API clients see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Parse, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Upstream, message)
    }

    fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::RateLimited => "provider.rate_limited",
            ProviderErrorKind::Parse => "provider.parse",
            ProviderErrorKind::Upstream => "provider.upstream",
        }
    }

    /// Map a non-2xx upstream status to an error.
    pub fn from_status(provider: ProviderId, status: u16) -> Self {
        if status == 429 {
            Self::rate_limited(format!("{provider} rate limited the request (status 429)"))
        } else {
            Self::unavailable(format!("{provider} returned status {status}"))
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Emptiness check applied to provider results before they are enveloped.
pub trait ProviderPayload {
    /// True when the provider had nothing for the requested symbol.
    fn is_empty_payload(&self) -> bool;
}

impl ProviderPayload for Value {
    fn is_empty_payload(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(flag) => !flag,
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::String(text) => text.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
        }
    }
}

impl ProviderPayload for CompanyInfo {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl ProviderPayload for Vec<HistoryRecord> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

/// Equity quote/details/option-chain source keyed by bare symbols.
pub trait EquityProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Latest trade information for the symbol.
    fn quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>>;

    /// Company and price-band details for the symbol.
    fn equity_details<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>>;

    /// Full option chain for an index or equity underlying.
    fn option_chain<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ProviderError>> + Send + 'a>>;
}

/// Price-history and fundamentals source keyed by exchange-qualified tickers.
pub trait MarketDataProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Ordered price series; `period` and `interval` are forwarded verbatim.
    ///
    /// An empty vector means the provider has no data for the ticker.
    fn history<'a>(
        &'a self,
        ticker: &'a str,
        period: &'a str,
        interval: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryRecord>, ProviderError>> + Send + 'a>>;

    /// Flat key/value company fundamentals.
    fn info<'a>(
        &'a self,
        ticker: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyInfo, ProviderError>> + Send + 'a>>;
}
