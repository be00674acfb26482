//! Request handlers.
//!
//! Every operation runs the same pipeline: validate the symbol, make exactly
//! one provider call, reject empty results, and fold the outcome into an
//! [`Envelope`]. Nothing fails past this boundary.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Resource;
use crate::provider::{EquityProvider, MarketDataProvider, ProviderError, ProviderPayload};
use crate::{Envelope, FinanceSummary, ProviderId, RequestError, Symbol};

pub const DEFAULT_PERIOD: &str = "1mo";
pub const DEFAULT_INTERVAL: &str = "1d";
/// Suffix that turns a bare NSE symbol into a market-data ticker.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";

/// API operations exposed by [`StockService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Quote,
    Details,
    Options,
    History,
    Finance,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Details => "details",
            Self::Options => "options",
            Self::History => "history",
            Self::Finance => "finance",
        }
    }

    const fn resource(self) -> Resource {
        match self {
            Self::Quote | Self::Details => Resource::Symbol,
            Self::Options => Resource::OptionChain,
            Self::History => Resource::History,
            Self::Finance => Resource::Finance,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless facade over the two providers.
pub struct StockService {
    equity: Arc<dyn EquityProvider>,
    market: Arc<dyn MarketDataProvider>,
    exchange_suffix: String,
}

impl StockService {
    pub fn new(equity: Arc<dyn EquityProvider>, market: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            equity,
            market,
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_owned(),
        }
    }

    pub fn with_exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = suffix.into();
        self
    }

    pub fn exchange_suffix(&self) -> &str {
        &self.exchange_suffix
    }

    /// Provider that serves `endpoint`.
    pub fn provider(&self, endpoint: Endpoint) -> ProviderId {
        match endpoint {
            Endpoint::Quote | Endpoint::Details | Endpoint::Options => self.equity.id(),
            Endpoint::History | Endpoint::Finance => self.market.id(),
        }
    }

    pub async fn quote(&self, raw_symbol: &str) -> Envelope {
        self.handle(
            Endpoint::Quote,
            raw_symbol,
            |symbol| async move { self.equity.quote(&symbol).await },
            Envelope::data,
        )
        .await
    }

    pub async fn details(&self, raw_symbol: &str) -> Envelope {
        self.handle(
            Endpoint::Details,
            raw_symbol,
            |symbol| async move { self.equity.equity_details(&symbol).await },
            Envelope::data,
        )
        .await
    }

    pub async fn options(&self, raw_symbol: &str) -> Envelope {
        self.handle(
            Endpoint::Options,
            raw_symbol,
            |symbol| async move { self.equity.option_chain(&symbol).await },
            Envelope::data,
        )
        .await
    }

    /// Price history; `None` selects the `1mo` period and `1d` interval.
    pub async fn history(
        &self,
        raw_symbol: &str,
        period: Option<&str>,
        interval: Option<&str>,
    ) -> Envelope {
        let period = period.unwrap_or(DEFAULT_PERIOD);
        let interval = interval.unwrap_or(DEFAULT_INTERVAL);

        self.handle(
            Endpoint::History,
            raw_symbol,
            |symbol| async move {
                let ticker = symbol.exchange_qualified(&self.exchange_suffix);
                self.market.history(&ticker, period, interval).await
            },
            |symbol, history| Envelope::history(symbol, period, interval, history),
        )
        .await
    }

    pub async fn finance(&self, raw_symbol: &str) -> Envelope {
        self.handle(
            Endpoint::Finance,
            raw_symbol,
            |symbol| async move {
                let ticker = symbol.exchange_qualified(&self.exchange_suffix);
                self.market.info(&ticker).await
            },
            |symbol, info| {
                let summary = FinanceSummary::from_info(&info, &symbol);
                Envelope::summary(symbol, summary)
            },
        )
        .await
    }

    async fn handle<T, F, Fut>(
        &self,
        endpoint: Endpoint,
        raw_symbol: &str,
        fetch: F,
        respond: impl FnOnce(Symbol, T) -> Envelope,
    ) -> Envelope
    where
        T: ProviderPayload,
        F: FnOnce(Symbol) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let provider = self.provider(endpoint);
        match fetch_checked(endpoint, raw_symbol, fetch).await {
            Ok((symbol, payload)) => {
                debug!(%endpoint, %provider, %symbol, "request served");
                respond(symbol, payload)
            }
            Err(error) => {
                match &error {
                    RequestError::Provider(fault) => {
                        warn!(
                            %endpoint,
                            %provider,
                            code = fault.code(),
                            error = %fault,
                            "provider call failed"
                        );
                    }
                    other => debug!(%endpoint, raw_symbol, error = %other, "request rejected"),
                }
                Envelope::from(error)
            }
        }
    }
}

async fn fetch_checked<T, F, Fut>(
    endpoint: Endpoint,
    raw_symbol: &str,
    fetch: F,
) -> Result<(Symbol, T), RequestError>
where
    T: ProviderPayload,
    F: FnOnce(Symbol) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let symbol = Symbol::parse(raw_symbol)?;
    let payload = fetch(symbol.clone()).await?;
    if payload.is_empty_payload() {
        return Err(RequestError::not_found(endpoint.resource(), &symbol));
    }
    Ok((symbol, payload))
}
