//! # Domain Models
//!
//! Per-request value types. Nothing here outlives a single request.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercase alphanumeric ticker |
//! | [`HistoryRecord`] | One row of a price series |
//! | [`CompanyInfo`] | Flat provider fundamentals map |
//! | [`FinanceSummary`] | Eight-field projection of [`CompanyInfo`] |

mod models;
mod symbol;

pub use models::{CompanyInfo, FinanceSummary, HistoryRecord};
pub use symbol::Symbol;
