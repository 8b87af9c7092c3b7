//! Cross-rate currency conversion through the anchor currency.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CurrencyCode, ExchangeRates};

/// Errors raised by currency conversion.
///
/// An unknown code is always an error — assuming a 1:1 rate would quietly
/// corrupt every downstream figure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("unknown currency '{0}'")]
    UnknownCurrency(CurrencyCode),
}

/// Converts `amount` from one currency to another via the anchor:
/// `amount * rate[to] / rate[from]`.
///
/// The result is unrounded; callers display-round at the edge.
///
/// # Errors
///
/// [`ConvertError::UnknownCurrency`] when either code is absent from the
/// table.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use comp_core::calculations::currency::convert;
/// use comp_core::models::{CurrencyCode, ExchangeRates};
///
/// let rates = ExchangeRates::new(
///     CurrencyCode::new("GBP"),
///     [
///         (CurrencyCode::new("GBP"), dec!(1)),
///         (CurrencyCode::new("USD"), dec!(1.25)),
///         (CurrencyCode::new("EUR"), dec!(1.20)),
///     ],
/// )
/// .unwrap();
///
/// let eur = convert(&rates, dec!(100), &CurrencyCode::new("USD"), &CurrencyCode::new("EUR"))
///     .unwrap();
/// assert_eq!(eur, dec!(96));
/// ```
pub fn convert(
    rates: &ExchangeRates,
    amount: Decimal,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<Decimal, ConvertError> {
    let from_rate = rates
        .rate(from)
        .ok_or_else(|| ConvertError::UnknownCurrency(from.clone()))?;
    let to_rate = rates
        .rate(to)
        .ok_or_else(|| ConvertError::UnknownCurrency(to.clone()))?;

    Ok(amount * to_rate / from_rate)
}
