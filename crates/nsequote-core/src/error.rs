use thiserror::Error;

use crate::provider::ProviderError;
use crate::Symbol;

/// Validation errors raised while normalizing user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
}

/// Resource kinds used to phrase "not found" messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Symbol,
    OptionChain,
    History,
    Finance,
}

impl Resource {
    pub fn not_found_message(self, symbol: &Symbol) -> String {
        match self {
            Self::Symbol => format!("Symbol '{symbol}' not found."),
            Self::OptionChain => format!("Option chain for '{symbol}' not found."),
            Self::History => format!("Historical data for '{symbol}' not found."),
            Self::Finance => format!("Financial data for '{symbol}' not found."),
        }
    }
}

/// Failure classes of a single API request.
///
/// Every variant is recovered at the handler boundary and rendered as an
/// error envelope; none of them reaches the transport layer.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid symbol!")]
    InvalidSymbol(#[source] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RequestError {
    pub fn not_found(resource: Resource, symbol: &Symbol) -> Self {
        Self::NotFound(resource.not_found_message(symbol))
    }
}

impl From<ValidationError> for RequestError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidSymbol(value)
    }
}
