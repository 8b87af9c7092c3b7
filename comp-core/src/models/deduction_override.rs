use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a location-specific deduction entry is assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideBasis {
    /// Fixed annual amount in local currency.
    FlatAnnual(Decimal),
    /// Fraction of gross income (0.03 = 3%).
    PercentOfIncome(Decimal),
}

/// A city- or neighborhood-specific mandatory deduction (municipal tax,
/// church tax, local levy).
///
/// Entries attach to exactly one city or neighborhood and match by that
/// entity only — a neighborhood does not inherit its city's entries; the
/// deduction calculator applies both levels explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionOverride {
    pub label: String,
    pub basis: OverrideBasis,
}

impl DeductionOverride {
    /// Annual amount this entry charges against `gross` income.
    pub fn amount(&self, gross: Decimal) -> Decimal {
        match self.basis {
            OverrideBasis::FlatAnnual(amount) => amount,
            OverrideBasis::PercentOfIncome(rate) => gross * rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn flat_annual_ignores_income() {
        let entry = DeductionOverride {
            label: "municipal levy".to_string(),
            basis: OverrideBasis::FlatAnnual(dec!(1200)),
        };

        assert_eq!(entry.amount(dec!(50000)), dec!(1200));
        assert_eq!(entry.amount(dec!(500000)), dec!(1200));
    }

    #[test]
    fn percent_of_income_scales_with_income() {
        let entry = DeductionOverride {
            label: "city tax".to_string(),
            basis: OverrideBasis::PercentOfIncome(dec!(0.03)),
        };

        assert_eq!(entry.amount(dec!(100000)), dec!(3000.00));
    }
}
