//! # nsequote core
//!
//! Symbol validation, provider adapters and the uniform response envelope
//! behind the nsequote HTTP API.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | NSE India (equity) and Yahoo Finance (market data) adapters |
//! | [`domain`] | Symbol, history rows, finance summary |
//! | [`envelope`] | Success/error response envelope |
//! | [`error`] | Validation and request error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`provider`] | Provider traits and provider errors |
//! | [`service`] | Request handlers |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nsequote_core::{NseAdapter, ReqwestHttpClient, StockService, YahooAdapter};
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let service = StockService::new(
//!     Arc::new(NseAdapter::new(http.clone())),
//!     Arc::new(YahooAdapter::new(http)),
//! );
//!
//! let envelope = service.quote("tcs").await;
//! println!("{}", serde_json::to_string(&envelope)?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP handler   │
//! └────────┬────────┘
//!          │ raw symbol
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  StockService   │────▶│ Symbol::parse    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Provider trait  │────▶│ HttpClient       │
//! │ (NSE / Yahoo)   │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Envelope     │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Handlers never return `Result`: an invalid symbol, an empty provider
//! result and a provider fault all become an error [`Envelope`].
//!
//! ```rust
//! use nsequote_core::{Envelope, RequestError, Symbol};
//!
//! let envelope = match Symbol::parse("tcs!") {
//!     Ok(_) => unreachable!(),
//!     Err(error) => Envelope::from(RequestError::from(error)),
//! };
//! assert_eq!(envelope.message(), Some("Invalid symbol!"));
//! ```

pub mod adapters;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod service;
pub mod source;

pub use adapters::{NseAdapter, YahooAdapter};

pub use domain::{CompanyInfo, FinanceSummary, HistoryRecord, Symbol};

pub use envelope::{Envelope, SuccessBody};

pub use error::{RequestError, Resource, ValidationError};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use provider::{
    EquityProvider, MarketDataProvider, ProviderError, ProviderErrorKind, ProviderPayload,
};

pub use service::{
    Endpoint, StockService, DEFAULT_EXCHANGE_SUFFIX, DEFAULT_INTERVAL, DEFAULT_PERIOD,
};

pub use source::ProviderId;
