use serde::Serialize;
use serde_json::Value;

use crate::{FinanceSummary, HistoryRecord, RequestError, Symbol};

/// Uniform response shape returned by every API handler.
///
/// Serializes as `{"status":"success","symbol":…, …}` or
/// `{"status":"error","message":…}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        symbol: Symbol,
        #[serde(flatten)]
        body: SuccessBody,
    },
    Error {
        message: String,
    },
}

/// Endpoint-specific part of a success envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuccessBody {
    Data {
        data: Value,
    },
    Summary {
        data: FinanceSummary,
    },
    History {
        period: String,
        interval: String,
        history: Vec<HistoryRecord>,
    },
}

impl Envelope {
    pub fn data(symbol: Symbol, data: Value) -> Self {
        Self::Success {
            symbol,
            body: SuccessBody::Data { data },
        }
    }

    pub fn summary(symbol: Symbol, data: FinanceSummary) -> Self {
        Self::Success {
            symbol,
            body: SuccessBody::Summary { data },
        }
    }

    pub fn history(
        symbol: Symbol,
        period: impl Into<String>,
        interval: impl Into<String>,
        history: Vec<HistoryRecord>,
    ) -> Self {
        Self::Success {
            symbol,
            body: SuccessBody::History {
                period: period.into(),
                interval: interval.into(),
                history,
            },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error text, if this is an error envelope.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }
}

impl From<RequestError> for Envelope {
    fn from(error: RequestError) -> Self {
        Self::error(error.to_string())
    }
}
