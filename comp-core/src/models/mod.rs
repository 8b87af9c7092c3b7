mod city;
mod country;
mod currency;
mod deduction_override;
mod exchange_rates;
mod ids;
mod job_title;
mod neighborhood;
mod tax_bracket;

pub use city::{City, LivingCosts, NewCity};
pub use country::{Country, DeductionRules, NewCountry, SocialSecurityRule};
pub use currency::CurrencyCode;
pub use deduction_override::{DeductionOverride, OverrideBasis};
pub use exchange_rates::{ExchangeRateError, ExchangeRates};
pub use ids::{CityId, CountryId, JobTitleId, NeighborhoodId};
pub use job_title::{JobTitle, NewJobTitle, SeniorityLevel};
pub use neighborhood::{Neighborhood, NewNeighborhood};
pub use tax_bracket::TaxBracket;
