use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO-4217-style currency code ("USD", "EUR", "JPY").
///
/// Codes are normalized to uppercase on construction so that lookups in the
/// exchange-rate table never miss on case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    /// The US dollar, in which all baseline reference data is expressed.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_normalizes_case_and_whitespace() {
        assert_eq!(CurrencyCode::new(" eur "), CurrencyCode::new("EUR"));
    }

    #[test]
    fn usd_is_the_usd_code() {
        assert_eq!(CurrencyCode::usd().as_str(), "USD");
    }

    #[test]
    fn display_prints_the_code() {
        assert_eq!(CurrencyCode::new("JPY").to_string(), "JPY");
    }
}
