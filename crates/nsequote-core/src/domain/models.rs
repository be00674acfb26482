use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::Symbol;

/// Flat key/value company fundamentals as reported by the market-data provider.
pub type CompanyInfo = Map<String, Value>;

/// One row of a price series.
///
/// Serializes with the time index flattened into a `Date` field (daily and
/// coarser bars) or a `Datetime` field (intraday bars), followed by the
/// OHLCV columns, dividends and stock splits.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub timestamp: OffsetDateTime,
    pub intraday: bool,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
    pub dividends: f64,
    pub stock_splits: f64,
}

impl HistoryRecord {
    pub const fn index_label(&self) -> &'static str {
        if self.intraday {
            "Datetime"
        } else {
            "Date"
        }
    }
}

impl Serialize for HistoryRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let index = self.timestamp.format(&Rfc3339).map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry(self.index_label(), &index)?;
        map.serialize_entry("Open", &self.open)?;
        map.serialize_entry("High", &self.high)?;
        map.serialize_entry("Low", &self.low)?;
        map.serialize_entry("Close", &self.close)?;
        map.serialize_entry("Volume", &self.volume)?;
        map.serialize_entry("Dividends", &self.dividends)?;
        map.serialize_entry("Stock Splits", &self.stock_splits)?;
        map.end()
    }
}

/// Fixed eight-field projection of [`CompanyInfo`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    #[serde(rename = "Company")]
    pub company: Value,
    #[serde(rename = "Market Cap")]
    pub market_cap: Value,
    #[serde(rename = "PE Ratio")]
    pub pe_ratio: Value,
    #[serde(rename = "PB Ratio")]
    pub pb_ratio: Value,
    #[serde(rename = "EPS")]
    pub eps: Value,
    #[serde(rename = "Dividend Yield")]
    pub dividend_yield: Value,
    #[serde(rename = "52-Week High")]
    pub fifty_two_week_high: Value,
    #[serde(rename = "52-Week Low")]
    pub fifty_two_week_low: Value,
}

impl FinanceSummary {
    /// Project the summary fields out of `info`; missing keys become `null`
    /// except the company name, which falls back to the symbol.
    pub fn from_info(info: &CompanyInfo, symbol: &Symbol) -> Self {
        let field = |key: &str| info.get(key).filter(|value| !value.is_null()).cloned();

        Self {
            company: field("shortName").unwrap_or_else(|| Value::from(symbol.as_str())),
            market_cap: field("marketCap").unwrap_or_default(),
            pe_ratio: field("trailingPE").unwrap_or_default(),
            pb_ratio: field("priceToBook").unwrap_or_default(),
            eps: field("trailingEps").unwrap_or_default(),
            dividend_yield: field("dividendYield").unwrap_or_default(),
            fifty_two_week_high: field("fiftyTwoWeekHigh").unwrap_or_default(),
            fifty_two_week_low: field("fiftyTwoWeekLow").unwrap_or_default(),
        }
    }
}
