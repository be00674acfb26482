mod nse;
mod yahoo;

pub use nse::{NseAdapter, NSE_BASE_URL};
pub use yahoo::{YahooAdapter, YAHOO_API_BASE_URL, YAHOO_COOKIE_URL};
