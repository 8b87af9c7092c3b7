//! Progressive income tax over a bracket schedule.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::TaxBracket;

use super::common::round_half_up;

/// Computes progressive income tax on `gross` under the given schedule.
///
/// Each bracket taxes the slice of income between the previous upper bound
/// and `min(gross, upper)` at its marginal rate; an unbounded final bracket
/// (`upper: None`) taxes everything above the last finite bound. The
/// schedule's ordering invariants are enforced by the store builder, so the
/// walk here trusts them.
///
/// Zero or negative income and an empty schedule (a tax-free jurisdiction)
/// both yield zero — legitimate inputs, not errors.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use comp_core::calculations::tax::progressive_tax;
/// use comp_core::models::TaxBracket;
///
/// let brackets = vec![
///     TaxBracket::up_to(dec!(50000), dec!(0.10)),
///     TaxBracket::above_last(dec!(0.30)),
/// ];
///
/// // 50_000 * 10% + 30_000 * 30%
/// assert_eq!(progressive_tax(dec!(80000), &brackets), dec!(14000.00));
/// ```
pub fn progressive_tax(gross: Decimal, brackets: &[TaxBracket]) -> Decimal {
    if gross <= Decimal::ZERO {
        if gross < Decimal::ZERO {
            warn!(%gross, "negative income treated as zero for tax purposes");
        }
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for bracket in brackets {
        let slice_top = match bracket.upper {
            Some(upper) => upper.min(gross),
            None => gross,
        };
        if slice_top <= lower {
            break;
        }
        tax += (slice_top - lower) * bracket.rate;

        match bracket.upper {
            Some(upper) if gross > upper => lower = upper,
            _ => break,
        }
    }

    round_half_up(tax)
}
