use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::currency::CurrencyCode;

/// Errors raised while assembling the exchange-rate table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRateError {
    /// The anchor currency has no entry in the table.
    #[error("anchor currency '{0}' missing from exchange-rate table")]
    MissingAnchor(CurrencyCode),

    /// The anchor must trivially convert to itself.
    #[error("anchor currency '{0}' must have rate 1, got {1}")]
    AnchorRateNotOne(CurrencyCode, Decimal),

    /// Rates must be strictly positive to be usable as divisors.
    #[error("exchange rate for '{0}' must be positive, got {1}")]
    NonPositiveRate(CurrencyCode, Decimal),

    #[error("duplicate exchange rate for '{0}'")]
    DuplicateCurrency(CurrencyCode),
}

/// Immutable table of currency rates relative to a fixed anchor currency.
///
/// Cross-rate conversion goes through the anchor:
/// `amount_in_to = amount_in_from * rate[to] / rate[from]`. Any currency may
/// serve as the anchor as long as its own entry is exactly 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    anchor: CurrencyCode,
    rates: HashMap<CurrencyCode, Decimal>,
}

impl ExchangeRates {
    /// Build a validated table from `(code, rate)` pairs.
    ///
    /// # Errors
    ///
    /// Rejects non-positive rates, duplicate codes, a missing anchor entry,
    /// and an anchor entry whose rate is not exactly 1.
    pub fn new<I>(anchor: CurrencyCode, pairs: I) -> Result<Self, ExchangeRateError>
    where
        I: IntoIterator<Item = (CurrencyCode, Decimal)>,
    {
        let mut rates = HashMap::new();
        for (code, rate) in pairs {
            if rate <= Decimal::ZERO {
                return Err(ExchangeRateError::NonPositiveRate(code, rate));
            }
            if rates.insert(code.clone(), rate).is_some() {
                return Err(ExchangeRateError::DuplicateCurrency(code));
            }
        }

        match rates.get(&anchor) {
            None => return Err(ExchangeRateError::MissingAnchor(anchor)),
            Some(rate) if *rate != Decimal::ONE => {
                return Err(ExchangeRateError::AnchorRateNotOne(anchor, *rate));
            }
            Some(_) => {}
        }

        Ok(Self { anchor, rates })
    }

    pub fn anchor(&self) -> &CurrencyCode {
        &self.anchor
    }

    /// Rate of `code` relative to the anchor, if the currency is known.
    pub fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
