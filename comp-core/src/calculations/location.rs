//! Cost-of-living adjustments for salaries, rents, and derived indices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{City, Neighborhood};

use super::common::round_half_up;

const REFERENCE_COLI: Decimal = Decimal::ONE_HUNDRED;

/// Scales a reference-city baseline salary by a city's cost index:
/// `baseline * coli / 100`.
///
/// Salary is assumed to scale linearly and exactly with the overall cost
/// index. This is a display and estimation heuristic, not a labor-market
/// model, and is kept deliberately simple.
///
/// A non-positive cost index resolves to zero rather than an error.
pub fn adjusted_salary(baseline: Decimal, coli: Decimal) -> Decimal {
    if coli <= Decimal::ZERO {
        warn!(%coli, "non-positive cost index; adjusted salary resolves to zero");
        return Decimal::ZERO;
    }
    round_half_up(baseline * coli / REFERENCE_COLI)
}

/// Rescales a salary from one city's cost level to another's:
/// `amount * to_coli / from_coli`.
///
/// Used for "what you'd need in city B" comparisons. A non-positive source
/// index resolves to zero.
pub fn equivalent_salary(amount: Decimal, from_coli: Decimal, to_coli: Decimal) -> Decimal {
    if from_coli <= Decimal::ZERO || to_coli <= Decimal::ZERO {
        warn!(%from_coli, %to_coli, "non-positive cost index; equivalent salary resolves to zero");
        return Decimal::ZERO;
    }
    round_half_up(amount * to_coli / from_coli)
}

/// Neighborhood-level cost figures derived from the city average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodProfile {
    /// `city.rent_1br * multiplier`, monthly USD.
    pub rent_1br: Decimal,
    /// `city.coli * multiplier` — an approximation: the rent multiplier is
    /// reused as a stand-in for a measured neighborhood cost index, which
    /// the reference data does not have.
    pub coli: Decimal,
}

/// Derives a neighborhood's rent and approximate cost index by applying its
/// single multiplier to the city baselines.
pub fn neighborhood_profile(city: &City, neighborhood: &Neighborhood) -> NeighborhoodProfile {
    NeighborhoodProfile {
        rent_1br: round_half_up(city.rent_1br * neighborhood.multiplier),
        coli: city.coli * neighborhood.multiplier,
    }
}
