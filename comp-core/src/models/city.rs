use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;
use super::deduction_override::DeductionOverride;
use super::ids::{CityId, CountryId};

/// Monthly living costs excluding rent, in USD.
///
/// These are the essentials the budget tier model adds on top of rent;
/// discretionary spending is covered by the tier margins, not itemized here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivingCosts {
    pub groceries: Decimal,
    pub utilities: Decimal,
    pub transport: Decimal,
    pub healthcare: Decimal,
}

impl LivingCosts {
    /// Total monthly essentials excluding rent.
    pub fn monthly_total(&self) -> Decimal {
        self.groceries + self.utilities + self.transport + self.healthcare
    }
}

/// A city with its cost profile and jurisdiction references.
///
/// `coli` is the Cost of Living Index, where 100 is the reference city that
/// job salary baselines are pegged to. `rent_1br` and the living-cost
/// breakdown are monthly USD figures for the city average; neighborhood
/// variants are derived via multipliers, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub country: CountryId,
    pub currency: CurrencyCode,
    pub coli: Decimal,
    pub rent_1br: Decimal,
    pub living_costs: LivingCosts,
    pub region: String,
    pub overrides: Vec<DeductionOverride>,
}

/// A city not yet admitted to the store; the builder assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub country: CountryId,
    pub currency: CurrencyCode,
    pub coli: Decimal,
    pub rent_1br: Decimal,
    pub living_costs: LivingCosts,
    pub region: String,
    pub overrides: Vec<DeductionOverride>,
}
