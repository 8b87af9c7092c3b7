use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of a progressive income tax schedule.
///
/// `upper` is the bracket's upper income bound in local currency; `None`
/// marks the unbounded top bracket. `rate` is the marginal rate as a
/// fraction (0.30 = 30%). Brackets are stored in ascending order of upper
/// bound, with the lower bound implied by the previous bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    /// Bracket covering income up to `upper`.
    pub fn up_to(upper: Decimal, rate: Decimal) -> Self {
        Self {
            upper: Some(upper),
            rate,
        }
    }

    /// The unbounded top bracket.
    pub fn above_last(rate: Decimal) -> Self {
        Self { upper: None, rate }
    }
}
