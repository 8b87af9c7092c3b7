//! Immutable reference data store.
//!
//! All static tables — countries, cities, neighborhoods, job titles, and
//! the exchange-rate table — are assembled once at startup through
//! [`ReferenceStoreBuilder`], validated as they are added, and frozen into a
//! [`ReferenceStore`]. The store is read-only for the lifetime of the
//! process; every compute path borrows it, none mutates it, so it is safe
//! to share across threads without locking.
//!
//! Display names are resolved to dense integer ids exactly once, here.
//! Compute functions operate on ids and never re-resolve strings.

mod builder;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{
    City, CityId, Country, CountryId, CurrencyCode, ExchangeRateError, ExchangeRates, JobTitle,
    JobTitleId, Neighborhood, NeighborhoodId,
};

pub use builder::ReferenceStoreBuilder;

/// Errors raised while building the store or resolving names to ids.
///
/// Lookup failures are fail-fast by design: substituting a default city or
/// currency would silently produce plausible-but-wrong financial figures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown country '{0}'")]
    UnknownCountry(String),

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("unknown neighborhood '{name}' in city '{city}'")]
    UnknownNeighborhood { city: String, name: String },

    #[error("unknown job title '{0}'")]
    UnknownJobTitle(String),

    #[error("city '{city}' references currency '{currency}' absent from the exchange-rate table")]
    UnknownCurrency { city: String, currency: CurrencyCode },

    #[error("duplicate country '{0}'")]
    DuplicateCountry(String),

    #[error("duplicate city '{0}'")]
    DuplicateCity(String),

    #[error("duplicate neighborhood '{name}' in city '{city}'")]
    DuplicateNeighborhood { city: String, name: String },

    #[error("duplicate job title '{0}'")]
    DuplicateJobTitle(String),

    #[error("cost index for '{city}' must be positive, got {coli}")]
    NonPositiveCostIndex {
        city: String,
        coli: rust_decimal::Decimal,
    },

    #[error("baseline rent for '{city}' must not be negative, got {rent}")]
    NegativeRent {
        city: String,
        rent: rust_decimal::Decimal,
    },

    #[error("multiplier for neighborhood '{neighborhood}' must be positive, got {multiplier}")]
    NonPositiveMultiplier {
        neighborhood: String,
        multiplier: rust_decimal::Decimal,
    },

    #[error("bracket upper bounds for '{country}' must be strictly increasing")]
    BracketBoundsNotAscending { country: String },

    #[error("unbounded bracket for '{country}' must be the last bracket")]
    UnboundedBracketNotLast { country: String },

    #[error("bracket rate for '{country}' must be between 0 and 1, got {rate}")]
    InvalidBracketRate {
        country: String,
        rate: rust_decimal::Decimal,
    },

    #[error("deduction rate for '{country}' must be between 0 and 1, got {rate}")]
    InvalidDeductionRate {
        country: String,
        rate: rust_decimal::Decimal,
    },

    #[error("social security cap for '{country}' must be positive, got {cap}")]
    NonPositiveCap {
        country: String,
        cap: rust_decimal::Decimal,
    },

    #[error("override rate for '{owner}' must be between 0 and 1, got {rate}")]
    InvalidOverrideRate {
        owner: String,
        rate: rust_decimal::Decimal,
    },

    #[error("salary band for '{job}' must satisfy 0 <= low <= mid <= high")]
    InvalidSalaryBand { job: String },

    #[error("country id does not belong to this store")]
    InvalidCountryRef,

    #[error("city id does not belong to this store")]
    InvalidCityRef,

    #[error(transparent)]
    Exchange(#[from] ExchangeRateError),
}

/// The frozen reference tables.
///
/// Accessors taking an id are infallible: ids are only minted by the builder
/// that produced this store, so an id in hand is proof the entity exists.
/// Name-based resolution goes through the `resolve_*` methods and fails with
/// a [`StoreError`] rather than substituting a default.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    countries: Vec<Country>,
    cities: Vec<City>,
    neighborhoods: Vec<Neighborhood>,
    jobs: Vec<JobTitle>,
    exchange: ExchangeRates,
    country_index: HashMap<String, CountryId>,
    city_index: HashMap<String, CityId>,
    neighborhood_index: HashMap<(CityId, String), NeighborhoodId>,
    job_index: HashMap<String, JobTitleId>,
}

impl ReferenceStore {
    pub fn country(&self, id: CountryId) -> &Country {
        &self.countries[id.index()]
    }

    pub fn city(&self, id: CityId) -> &City {
        &self.cities[id.index()]
    }

    pub fn neighborhood(&self, id: NeighborhoodId) -> &Neighborhood {
        &self.neighborhoods[id.index()]
    }

    pub fn job_title(&self, id: JobTitleId) -> &JobTitle {
        &self.jobs[id.index()]
    }

    pub fn exchange_rates(&self) -> &ExchangeRates {
        &self.exchange
    }

    pub fn resolve_country(&self, name: &str) -> Result<CountryId, StoreError> {
        self.country_index
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownCountry(name.to_string()))
    }

    pub fn resolve_city(&self, name: &str) -> Result<CityId, StoreError> {
        self.city_index
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownCity(name.to_string()))
    }

    pub fn resolve_neighborhood(
        &self,
        city: CityId,
        name: &str,
    ) -> Result<NeighborhoodId, StoreError> {
        self.neighborhood_index
            .get(&(city, name.to_string()))
            .copied()
            .ok_or_else(|| StoreError::UnknownNeighborhood {
                city: self.city(city).name.clone(),
                name: name.to_string(),
            })
    }

    pub fn resolve_job_title(&self, name: &str) -> Result<JobTitleId, StoreError> {
        self.job_index
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownJobTitle(name.to_string()))
    }

    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn job_titles(&self) -> impl Iterator<Item = &JobTitle> {
        self.jobs.iter()
    }

    pub fn neighborhoods_of(&self, city: CityId) -> impl Iterator<Item = &Neighborhood> {
        self.neighborhoods.iter().filter(move |n| n.city == city)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{
        CurrencyCode, DeductionRules, LivingCosts, NewCity, NewCountry, NewJobTitle,
        NewNeighborhood, TaxBracket,
    };

    use super::*;

    fn usd_only_rates() -> ExchangeRates {
        ExchangeRates::new(CurrencyCode::usd(), [(CurrencyCode::usd(), dec!(1))]).unwrap()
    }

    fn basic_living_costs() -> LivingCosts {
        LivingCosts {
            groceries: dec!(350),
            utilities: dec!(200),
            transport: dec!(100),
            healthcare: dec!(300),
        }
    }

    fn store_with_one_of_everything() -> ReferenceStore {
        let mut builder = ReferenceStoreBuilder::new(usd_only_rates());
        let country = builder
            .add_country(NewCountry {
                name: "United States".to_string(),
                brackets: vec![TaxBracket::above_last(dec!(0.20))],
                deductions: DeductionRules::default(),
            })
            .unwrap();
        let city = builder
            .add_city(NewCity {
                name: "New York".to_string(),
                country,
                currency: CurrencyCode::usd(),
                coli: dec!(100),
                rent_1br: dec!(3500),
                living_costs: basic_living_costs(),
                region: "North America".to_string(),
                overrides: vec![],
            })
            .unwrap();
        builder
            .add_neighborhood(NewNeighborhood {
                city,
                name: "Midtown".to_string(),
                multiplier: dec!(1.3),
                overrides: vec![],
            })
            .unwrap();
        builder
            .add_job_title(NewJobTitle {
                name: "Software Engineer".to_string(),
                low: dec!(90000),
                mid: dec!(140000),
                high: dec!(210000),
            })
            .unwrap();
        builder.build()
    }

    // =========================================================================
    // resolution tests
    // =========================================================================

    #[test]
    fn resolve_city_finds_known_city() {
        let store = store_with_one_of_everything();

        let id = store.resolve_city("New York").unwrap();

        assert_eq!(store.city(id).name, "New York");
    }

    #[test]
    fn resolve_city_rejects_unknown_name() {
        let store = store_with_one_of_everything();

        assert_eq!(
            store.resolve_city("Atlantis"),
            Err(StoreError::UnknownCity("Atlantis".to_string()))
        );
    }

    #[test]
    fn resolve_neighborhood_is_scoped_to_city() {
        let store = store_with_one_of_everything();
        let city = store.resolve_city("New York").unwrap();

        let id = store.resolve_neighborhood(city, "Midtown").unwrap();

        assert_eq!(store.neighborhood(id).multiplier, dec!(1.3));
    }

    #[test]
    fn resolve_neighborhood_rejects_unknown_name() {
        let store = store_with_one_of_everything();
        let city = store.resolve_city("New York").unwrap();

        assert_eq!(
            store.resolve_neighborhood(city, "Nowhere"),
            Err(StoreError::UnknownNeighborhood {
                city: "New York".to_string(),
                name: "Nowhere".to_string(),
            })
        );
    }

    #[test]
    fn resolve_country_and_job_title_round_trip() {
        let store = store_with_one_of_everything();

        let country = store.resolve_country("United States").unwrap();
        let job = store.resolve_job_title("Software Engineer").unwrap();

        assert_eq!(store.country(country).name, "United States");
        assert_eq!(store.job_title(job).mid, dec!(140000));
    }

    #[test]
    fn neighborhoods_of_filters_by_city() {
        let store = store_with_one_of_everything();
        let city = store.resolve_city("New York").unwrap();

        let names: Vec<_> = store.neighborhoods_of(city).map(|n| n.name.as_str()).collect();

        assert_eq!(names, vec!["Midtown"]);
    }
}
