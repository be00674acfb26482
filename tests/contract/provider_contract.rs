//! Contract tests: the real NSE and Yahoo adapters driven through
//! `StockService` against canned upstream responses.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use nsequote_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NseAdapter, StockService, YahooAdapter,
};
use serde_json::{json, Value};

const NSE_BASE: &str = "https://nse.test";
const YAHOO_API: &str = "https://yahoo.test";
const YAHOO_COOKIE: &str = "https://fc.test";

/// Answers each request with the first route whose pattern occurs in the URL.
struct RoutedHttpClient {
    routes: Vec<(&'static str, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    fn new(routes: Vec<(&'static str, HttpResponse)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| HttpError::new(format!("connection refused: {}", request.url)));
        self.requests.lock().expect("requests lock").push(request);
        Box::pin(async move { response })
    }
}

fn nse_service(client: &Arc<RoutedHttpClient>) -> StockService {
    let unused_market = RoutedHttpClient::new(Vec::new());
    StockService::new(
        Arc::new(NseAdapter::new(client.clone()).with_base_url(NSE_BASE)),
        Arc::new(YahooAdapter::new(unused_market).with_base_urls(YAHOO_API, YAHOO_COOKIE)),
    )
}

fn yahoo_service(client: &Arc<RoutedHttpClient>) -> StockService {
    let unused_equity = RoutedHttpClient::new(Vec::new());
    StockService::new(
        Arc::new(NseAdapter::new(unused_equity).with_base_url(NSE_BASE)),
        Arc::new(YahooAdapter::new(client.clone()).with_base_urls(YAHOO_API, YAHOO_COOKIE)),
    )
}

fn to_json(envelope: &nsequote_core::Envelope) -> Value {
    serde_json::to_value(envelope).expect("envelope serializes")
}

fn home_page() -> (&'static str, HttpResponse) {
    (NSE_BASE, HttpResponse::ok_json("<html></html>"))
}

// =============================================================================
// NSE equity provider
// =============================================================================

#[tokio::test]
async fn nse_quote_opens_session_then_returns_trade_info() {
    let trade_info = json!({"marketDeptOrderBook": {"totalBuyQuantity": 41250, "totalSellQuantity": 38020}});
    let client = RoutedHttpClient::new(vec![
        (
            "/api/quote-equity?section=trade_info&symbol=TCS",
            HttpResponse::ok_json(trade_info.to_string()),
        ),
        home_page(),
    ]);

    let envelope = to_json(&nse_service(&client).quote("tcs").await);

    assert_eq!(
        envelope,
        json!({"status": "success", "symbol": "TCS", "data": trade_info})
    );
    assert_eq!(
        client.urls(),
        vec![
            "https://nse.test".to_owned(),
            "https://nse.test/api/quote-equity?section=trade_info&symbol=TCS".to_owned(),
        ]
    );
}

#[tokio::test]
async fn nse_session_is_opened_once_across_operations() {
    let client = RoutedHttpClient::new(vec![
        (
            "/api/quote-equity?section=trade_info&symbol=INFY",
            HttpResponse::ok_json(r#"{"securityWiseDP":{"deliveryQuantity":1}}"#),
        ),
        (
            "/api/quote-equity?symbol=INFY",
            HttpResponse::ok_json(r#"{"info":{"symbol":"INFY"}}"#),
        ),
        home_page(),
    ]);
    let service = nse_service(&client);

    assert!(service.quote("INFY").await.is_success());
    assert!(service.details("INFY").await.is_success());

    let homepage_visits = client
        .urls()
        .iter()
        .filter(|url| url.as_str() == NSE_BASE)
        .count();
    assert_eq!(homepage_visits, 1);
}

#[tokio::test]
async fn nse_index_option_chain_uses_index_endpoint() {
    let chain = json!({"records": {"expiryDates": ["30-May-2024"]}, "filtered": {"data": []}});
    let client = RoutedHttpClient::new(vec![
        (
            "/api/option-chain-indices?symbol=BANKNIFTY",
            HttpResponse::ok_json(chain.to_string()),
        ),
        home_page(),
    ]);

    let envelope = to_json(&nse_service(&client).options("banknifty").await);

    assert_eq!(envelope["status"], json!("success"));
    assert_eq!(envelope["data"], chain);
}

#[tokio::test]
async fn nse_empty_answer_becomes_not_found() {
    let client = RoutedHttpClient::new(vec![
        ("/api/quote-equity?symbol=ZZZZ", HttpResponse::ok_json("{}")),
        (
            "/api/option-chain-equities?symbol=ZZZZ",
            HttpResponse::ok_json(r#"{}"#),
        ),
        home_page(),
    ]);
    let service = nse_service(&client);

    assert_eq!(
        service.details("zzzz").await.message(),
        Some("Symbol 'ZZZZ' not found.")
    );
    assert_eq!(
        service.options("zzzz").await.message(),
        Some("Option chain for 'ZZZZ' not found.")
    );
}

#[tokio::test]
async fn nse_unreachable_reports_transport_fault() {
    let client = RoutedHttpClient::new(Vec::new());

    let envelope = nse_service(&client).quote("TCS").await;

    let message = envelope.message().expect("error envelope");
    assert!(message.contains("connection refused"), "{message}");
}

// =============================================================================
// Yahoo market-data provider
// =============================================================================

const CHART: &str = r#"{"chart":{"result":[{
    "meta":{"symbol":"RELIANCE.NS","gmtoffset":19800},
    "timestamp":[1714621500,1714707900],
    "indicators":{"quote":[{
        "open":[2870.0,2905.1],
        "high":[2920.0,2935.0],
        "low":[2861.0,2890.3],
        "close":[2911.6,2930.45],
        "volume":[5600000,4800000]
    }]}
}],"error":null}}"#;

#[tokio::test]
async fn yahoo_history_reaches_user_as_dated_rows() {
    let client = RoutedHttpClient::new(vec![(
        "/v8/finance/chart/RELIANCE.NS",
        HttpResponse::ok_json(CHART),
    )]);

    let envelope = to_json(&yahoo_service(&client).history("reliance", None, None).await);

    assert_eq!(envelope["status"], json!("success"));
    assert_eq!(envelope["symbol"], json!("RELIANCE"));
    assert_eq!(envelope["period"], json!("1mo"));
    assert_eq!(envelope["interval"], json!("1d"));
    assert_eq!(
        envelope["history"][0],
        json!({
            "Date": "2024-05-02T00:00:00+05:30",
            "Open": 2870.0,
            "High": 2920.0,
            "Low": 2861.0,
            "Close": 2911.6,
            "Volume": 5600000,
            "Dividends": 0.0,
            "Stock Splits": 0.0
        })
    );
    assert_eq!(
        client.urls(),
        vec![
            "https://yahoo.test/v8/finance/chart/RELIANCE.NS?range=1mo&interval=1d&events=div,splits"
                .to_owned()
        ]
    );
}

#[tokio::test]
async fn yahoo_unknown_ticker_history_is_not_found() {
    let client = RoutedHttpClient::new(vec![(
        "/v8/finance/chart/ZZZZ.NS",
        HttpResponse::with_status(
            404,
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        ),
    )]);

    let envelope = yahoo_service(&client)
        .history("zzzz", Some("5d"), Some("1h"))
        .await;

    assert_eq!(
        envelope.message(),
        Some("Historical data for 'ZZZZ' not found.")
    );
}

#[tokio::test]
async fn yahoo_finance_summary_is_projected_from_quote_summary() {
    let summary = r#"{"quoteSummary":{"result":[{
        "price":{"maxAge":1,"shortName":"INFOSYS LIMITED","marketCap":{"raw":6000000000000,"fmt":"6T"}},
        "summaryDetail":{"trailingPE":{"raw":24.3},"dividendYield":{"raw":0.027},
            "fiftyTwoWeekHigh":{"raw":1733.0},"fiftyTwoWeekLow":{"raw":1351.65}},
        "defaultKeyStatistics":{"priceToBook":{"raw":7.9},"trailingEps":{"raw":63.4}}
    }],"error":null}}"#;
    let client = RoutedHttpClient::new(vec![
        ("/v1/test/getcrumb", HttpResponse::ok_json("crumb1")),
        (
            "/v10/finance/quoteSummary/INFY.NS",
            HttpResponse::ok_json(summary),
        ),
        (YAHOO_COOKIE, HttpResponse::with_status(404, "")),
    ]);

    let envelope = to_json(&yahoo_service(&client).finance("infy").await);

    assert_eq!(
        envelope,
        json!({
            "status": "success",
            "symbol": "INFY",
            "data": {
                "Company": "INFOSYS LIMITED",
                "Market Cap": 6000000000000_i64,
                "PE Ratio": 24.3,
                "PB Ratio": 7.9,
                "EPS": 63.4,
                "Dividend Yield": 0.027,
                "52-Week High": 1733.0,
                "52-Week Low": 1351.65
            }
        })
    );
    let urls = client.urls();
    assert_eq!(urls[0], YAHOO_COOKIE);
    assert!(urls[2].ends_with("&crumb=crumb1"), "{}", urls[2]);
}

#[tokio::test]
async fn yahoo_rejected_session_is_a_fault_not_a_missing_symbol() {
    let client = RoutedHttpClient::new(vec![
        ("/v1/test/getcrumb", HttpResponse::ok_json("crumb1")),
        (
            "/v10/finance/quoteSummary/TCS.NS",
            HttpResponse::with_status(401, r#"{"finance":{"error":{"code":"Unauthorized"}}}"#),
        ),
        (YAHOO_COOKIE, HttpResponse::with_status(404, "")),
    ]);

    let envelope = yahoo_service(&client).finance("TCS").await;

    assert_eq!(
        envelope.message(),
        Some("yahoo rejected the session (status 401)")
    );
}
