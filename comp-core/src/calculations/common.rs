//! Shared helpers for the compensation calculations.

use rust_decimal::Decimal;

/// Rounds a monetary value to two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero, the standard financial
/// convention.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use comp_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator`, or zero when the denominator is not positive.
///
/// Used for effective-rate figures where a zero gross income must yield a
/// zero rate rather than a division error.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use comp_core::calculations::common::ratio_or_zero;
///
/// assert_eq!(ratio_or_zero(dec!(30000), dec!(100000)), dec!(0.3));
/// assert_eq!(ratio_or_zero(dec!(30000), dec!(0)), dec!(0));
/// ```
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
