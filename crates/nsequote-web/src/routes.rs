//! HTTP surface.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /stock/:symbol/quote` | [`StockService::quote`] |
//! | `GET /stock/:symbol/details` | [`StockService::details`] |
//! | `GET /stock/:symbol/options` | [`StockService::options`] |
//! | `GET /stock/:symbol/history?period&interval` | [`StockService::history`] |
//! | `GET /finance/:symbol` | [`StockService::finance`] |
//! | `GET /` | `index.html` from the static directory |
//! | `GET /static/*` | static assets |
//!
//! Envelope routes always answer 200; failures are reported in the body.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use nsequote_core::{Envelope, RequestError, StockService, Symbol};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared, immutable per-process state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StockService>,
}

/// `period` and `interval` query values of the history route.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryParams {
    pub period: Option<String>,
    pub interval: Option<String>,
}

impl HistoryParams {
    /// Repeated keys resolve to their last value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "period" => params.period = Some(value),
                "interval" => params.interval = Some(value),
                _ => {}
            }
        }
        params
    }
}

pub fn router(service: Arc<StockService>, static_dir: impl AsRef<FsPath>) -> Router {
    let static_dir = static_dir.as_ref();
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stock/:symbol/quote", get(quote))
        .route("/stock/:symbol/details", get(details))
        .route("/stock/:symbol/options", get(options))
        .route("/stock/:symbol/history", get(history))
        .route("/finance/:symbol", get(finance))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { service })
}

/// An undecodable path segment is treated like any other invalid symbol.
fn raw_symbol(path: Result<Path<String>, PathRejection>) -> String {
    path.map(|Path(symbol)| symbol).unwrap_or_default()
}

async fn quote(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Json<Envelope> {
    Json(state.service.quote(&raw_symbol(path)).await)
}

async fn details(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Json<Envelope> {
    Json(state.service.details(&raw_symbol(path)).await)
}

async fn options(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Json<Envelope> {
    Json(state.service.options(&raw_symbol(path)).await)
}

async fn history(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Envelope> {
    let raw = raw_symbol(path);
    let params = match query {
        Ok(Query(pairs)) => HistoryParams::from_pairs(pairs),
        Err(rejection) => {
            // an invalid symbol is reported ahead of a malformed query
            if let Err(error) = Symbol::parse(&raw) {
                return Json(Envelope::from(RequestError::from(error)));
            }
            return Json(Envelope::error(rejection.body_text()));
        }
    };

    Json(
        state
            .service
            .history(
                &raw,
                params.period.as_deref(),
                params.interval.as_deref(),
            )
            .await,
    )
}

async fn finance(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Json<Envelope> {
    Json(state.service.finance(&raw_symbol(path)).await)
}
