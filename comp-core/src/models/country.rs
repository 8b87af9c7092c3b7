use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::CountryId;
use super::tax_bracket::TaxBracket;

/// Mandatory social security contribution rule for a country.
///
/// `rate` applies to income up to `cap` (or all income when no cap is
/// configured). When `reduced_rate` is present, income above the cap is
/// charged at that rate instead of escaping contribution entirely — the
/// UK National Insurance shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityRule {
    /// Contribution rate as a fraction (0.08 = 8%).
    pub rate: Decimal,
    /// Annual income ceiling for the full rate, in local currency.
    pub cap: Option<Decimal>,
    /// Rate applied to income above `cap`, as a fraction.
    pub reduced_rate: Option<Decimal>,
}

/// Country-level mandatory deduction rules beyond the bracket schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRules {
    pub social_security: Option<SocialSecurityRule>,
    /// Solidarity-style surcharge as a fraction of the computed income tax
    /// (not of gross income).
    pub surcharge_rate: Option<Decimal>,
}

/// A tax jurisdiction: a bracket schedule plus deduction rules.
///
/// An empty bracket list models a tax-free jurisdiction. All amounts in the
/// schedule are in the country's local currency for the configured tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub brackets: Vec<TaxBracket>,
    pub deductions: DeductionRules,
}

/// A country not yet admitted to the store; the builder assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub brackets: Vec<TaxBracket>,
    pub deductions: DeductionRules,
}
