//! # nsequote web
//!
//! axum server exposing the nsequote API and the static web UI.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use nsequote_core::{NseAdapter, ReqwestHttpClient, StockService, YahooAdapter};

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::{router, AppState, HistoryParams};

/// Wire the production adapters around one shared HTTP client.
pub fn build_service(config: &ServerConfig) -> StockService {
    let http_client = Arc::new(ReqwestHttpClient::new());
    let equity = NseAdapter::new(http_client.clone()).with_timeout_ms(config.timeout_ms);
    let market = YahooAdapter::new(http_client).with_timeout_ms(config.timeout_ms);

    StockService::new(Arc::new(equity), Arc::new(market))
        .with_exchange_suffix(config.exchange_suffix.clone())
}
