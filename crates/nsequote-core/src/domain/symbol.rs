use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Normalized ticker symbol: uppercase ASCII letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trim, uppercase and validate a raw symbol.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticker used by the market-data provider, e.g. `TCS` + `.NS`.
    pub fn exchange_qualified(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" tcs ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "TCS");
    }

    #[test]
    fn accepts_leading_digits() {
        let parsed = Symbol::parse("3MINDIA").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "3MINDIA");
    }

    #[test]
    fn rejects_blank_input() {
        let err = Symbol::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn rejects_punctuation() {
        let err = Symbol::parse("M&M").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '&', index: 1 });
    }

    #[test]
    fn rejects_non_ascii_letters() {
        let err = Symbol::parse("ÄBC").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { index: 0, .. }));
    }

    #[test]
    fn rejects_inner_whitespace() {
        assert!(Symbol::parse("TATA MOTORS").is_err());
    }

    #[test]
    fn parsing_is_idempotent() {
        let once = Symbol::parse(" reliance\t").expect("symbol should parse");
        let twice = Symbol::parse(once.as_str()).expect("normalized symbol should parse");
        assert_eq!(once, twice);
    }

    #[test]
    fn builds_exchange_qualified_ticker() {
        let symbol = Symbol::parse("tcs").expect("symbol should parse");
        assert_eq!(symbol.exchange_qualified(".NS"), "TCS.NS");
    }
}
