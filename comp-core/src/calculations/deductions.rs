//! Mandatory deductions: social security, location overrides, surcharge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{City, Country, Neighborhood};

use super::common::{ratio_or_zero, round_half_up};
use super::tax::progressive_tax;

/// Income tax plus mandatory deductions for one gross income figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Progressive income tax under the country's bracket schedule.
    pub income_tax: Decimal,
    /// Social security, location overrides, and surcharge combined.
    pub deductions: Decimal,
    /// `(income_tax + deductions) / gross`, zero when gross is zero.
    pub total_rate: Decimal,
}

impl DeductionBreakdown {
    fn zero() -> Self {
        Self {
            income_tax: Decimal::ZERO,
            deductions: Decimal::ZERO,
            total_rate: Decimal::ZERO,
        }
    }

    /// Take-home income implied by this breakdown at `gross`.
    pub fn net(&self, gross: Decimal) -> Decimal {
        gross - self.income_tax - self.deductions
    }
}

/// Computes the full tax-and-deduction breakdown for `gross` annual income
/// in the local currency.
///
/// The evaluation order is load-bearing:
///
/// 1. social security — `rate * min(gross, cap)`, plus the reduced rate on
///    the excess above the cap when one is configured;
/// 2. location overrides — every entry attached to the city, then every
///    entry attached to the neighborhood, summed additively. Matching is by
///    exact entity; a neighborhood never inherits city entries implicitly
///    (the city's entries are applied because the city itself is in scope,
///    not through inheritance);
/// 3. surcharge — a fraction of the income tax computed in step 0, not of
///    gross income.
///
/// Zero or negative income short-circuits to an all-zero breakdown.
pub fn deduction_breakdown(
    gross: Decimal,
    country: &Country,
    city: &City,
    neighborhood: Option<&Neighborhood>,
) -> DeductionBreakdown {
    if gross <= Decimal::ZERO {
        if gross < Decimal::ZERO {
            warn!(%gross, country = %country.name, "negative income treated as zero for deductions");
        }
        return DeductionBreakdown::zero();
    }

    let income_tax = progressive_tax(gross, &country.brackets);
    let mut deductions = Decimal::ZERO;

    if let Some(ss) = &country.deductions.social_security {
        let capped_base = match ss.cap {
            Some(cap) => gross.min(cap),
            None => gross,
        };
        deductions += capped_base * ss.rate;

        if let (Some(cap), Some(reduced)) = (ss.cap, ss.reduced_rate) {
            if gross > cap {
                deductions += (gross - cap) * reduced;
            }
        }
    }

    for entry in city.overrides.iter() {
        deductions += entry.amount(gross);
    }
    if let Some(neighborhood) = neighborhood {
        for entry in neighborhood.overrides.iter() {
            deductions += entry.amount(gross);
        }
    }

    if let Some(surcharge) = country.deductions.surcharge_rate {
        deductions += income_tax * surcharge;
    }

    let deductions = round_half_up(deductions);

    DeductionBreakdown {
        income_tax,
        deductions,
        total_rate: ratio_or_zero(income_tax + deductions, gross),
    }
}
