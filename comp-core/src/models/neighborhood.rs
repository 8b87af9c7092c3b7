use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::deduction_override::DeductionOverride;
use super::ids::{CityId, NeighborhoodId};

/// A sub-area of a city, scaled off the city average by a single multiplier.
///
/// The multiplier (1.0 = city average) drives both the derived rent and the
/// approximate neighborhood cost index. Using one factor for both is a
/// deliberate modeling simplification — there is no independently measured
/// neighborhood-level data behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: NeighborhoodId,
    pub city: CityId,
    pub name: String,
    pub multiplier: Decimal,
    pub overrides: Vec<DeductionOverride>,
}

/// A neighborhood not yet admitted to the store; the builder assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNeighborhood {
    pub city: CityId,
    pub name: String,
    pub multiplier: Decimal,
    pub overrides: Vec<DeductionOverride>,
}
