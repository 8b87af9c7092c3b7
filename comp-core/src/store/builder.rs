use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{
    City, CityId, Country, CountryId, DeductionOverride, ExchangeRates, JobTitle, JobTitleId,
    Neighborhood, NeighborhoodId, NewCity, NewCountry, NewJobTitle, NewNeighborhood,
    OverrideBasis,
};

use super::{ReferenceStore, StoreError};

/// Assembles and validates the reference tables.
///
/// Every `add_*` method checks its invariants immediately and returns the
/// minted id on success, so an invalid record is rejected at the exact point
/// it is introduced rather than at a later bulk validation step. Once all
/// records are in, [`build`](Self::build) freezes the tables into a
/// [`ReferenceStore`].
pub struct ReferenceStoreBuilder {
    exchange: ExchangeRates,
    countries: Vec<Country>,
    cities: Vec<City>,
    neighborhoods: Vec<Neighborhood>,
    jobs: Vec<JobTitle>,
    country_index: HashMap<String, CountryId>,
    city_index: HashMap<String, CityId>,
    neighborhood_index: HashMap<(CityId, String), NeighborhoodId>,
    job_index: HashMap<String, JobTitleId>,
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

fn check_overrides(owner: &str, overrides: &[DeductionOverride]) -> Result<(), StoreError> {
    for entry in overrides {
        if let OverrideBasis::PercentOfIncome(rate) = entry.basis {
            if !is_fraction(rate) {
                return Err(StoreError::InvalidOverrideRate {
                    owner: owner.to_string(),
                    rate,
                });
            }
        }
    }
    Ok(())
}

impl ReferenceStoreBuilder {
    pub fn new(exchange: ExchangeRates) -> Self {
        Self {
            exchange,
            countries: Vec::new(),
            cities: Vec::new(),
            neighborhoods: Vec::new(),
            jobs: Vec::new(),
            country_index: HashMap::new(),
            city_index: HashMap::new(),
            neighborhood_index: HashMap::new(),
            job_index: HashMap::new(),
        }
    }

    /// Add a tax jurisdiction.
    ///
    /// # Errors
    ///
    /// Rejects duplicate names, bracket bounds that are not strictly
    /// increasing, an unbounded bracket anywhere but last, and any rate
    /// outside `[0, 1]`.
    pub fn add_country(&mut self, new: NewCountry) -> Result<CountryId, StoreError> {
        if self.country_index.contains_key(&new.name) {
            return Err(StoreError::DuplicateCountry(new.name));
        }

        let mut prev_upper: Option<Decimal> = None;
        for (i, bracket) in new.brackets.iter().enumerate() {
            if !is_fraction(bracket.rate) {
                return Err(StoreError::InvalidBracketRate {
                    country: new.name,
                    rate: bracket.rate,
                });
            }
            match bracket.upper {
                Some(upper) => {
                    if prev_upper.is_some_and(|prev| upper <= prev) || upper <= Decimal::ZERO {
                        return Err(StoreError::BracketBoundsNotAscending { country: new.name });
                    }
                    prev_upper = Some(upper);
                }
                None => {
                    if i + 1 != new.brackets.len() {
                        return Err(StoreError::UnboundedBracketNotLast { country: new.name });
                    }
                }
            }
        }

        if let Some(ss) = &new.deductions.social_security {
            if !is_fraction(ss.rate) {
                return Err(StoreError::InvalidDeductionRate {
                    country: new.name,
                    rate: ss.rate,
                });
            }
            if let Some(reduced) = ss.reduced_rate {
                if !is_fraction(reduced) {
                    return Err(StoreError::InvalidDeductionRate {
                        country: new.name,
                        rate: reduced,
                    });
                }
            }
            if let Some(cap) = ss.cap {
                if cap <= Decimal::ZERO {
                    return Err(StoreError::NonPositiveCap {
                        country: new.name,
                        cap,
                    });
                }
            }
        }
        if let Some(surcharge) = new.deductions.surcharge_rate {
            if !is_fraction(surcharge) {
                return Err(StoreError::InvalidDeductionRate {
                    country: new.name,
                    rate: surcharge,
                });
            }
        }

        let id = CountryId(self.countries.len() as u32);
        self.country_index.insert(new.name.clone(), id);
        self.countries.push(Country {
            id,
            name: new.name,
            brackets: new.brackets,
            deductions: new.deductions,
        });
        Ok(id)
    }

    /// Add a city.
    ///
    /// # Errors
    ///
    /// Rejects duplicate names, a country id from another store, a currency
    /// absent from the exchange-rate table, a non-positive cost index, a
    /// negative baseline rent, and override rates outside `[0, 1]`.
    pub fn add_city(&mut self, new: NewCity) -> Result<CityId, StoreError> {
        if self.city_index.contains_key(&new.name) {
            return Err(StoreError::DuplicateCity(new.name));
        }
        if new.country.index() >= self.countries.len() {
            return Err(StoreError::InvalidCountryRef);
        }
        if !self.exchange.contains(&new.currency) {
            return Err(StoreError::UnknownCurrency {
                city: new.name,
                currency: new.currency,
            });
        }
        if new.coli <= Decimal::ZERO {
            return Err(StoreError::NonPositiveCostIndex {
                city: new.name,
                coli: new.coli,
            });
        }
        if new.rent_1br < Decimal::ZERO {
            return Err(StoreError::NegativeRent {
                city: new.name,
                rent: new.rent_1br,
            });
        }
        check_overrides(&new.name, &new.overrides)?;

        let id = CityId(self.cities.len() as u32);
        self.city_index.insert(new.name.clone(), id);
        self.cities.push(City {
            id,
            name: new.name,
            country: new.country,
            currency: new.currency,
            coli: new.coli,
            rent_1br: new.rent_1br,
            living_costs: new.living_costs,
            region: new.region,
            overrides: new.overrides,
        });
        Ok(id)
    }

    /// Add a neighborhood to an existing city.
    ///
    /// # Errors
    ///
    /// Rejects a city id from another store, duplicate names within the
    /// city, a non-positive multiplier, and override rates outside `[0, 1]`.
    pub fn add_neighborhood(&mut self, new: NewNeighborhood) -> Result<NeighborhoodId, StoreError> {
        if new.city.index() >= self.cities.len() {
            return Err(StoreError::InvalidCityRef);
        }
        let key = (new.city, new.name.clone());
        if self.neighborhood_index.contains_key(&key) {
            return Err(StoreError::DuplicateNeighborhood {
                city: self.cities[new.city.index()].name.clone(),
                name: new.name,
            });
        }
        if new.multiplier <= Decimal::ZERO {
            return Err(StoreError::NonPositiveMultiplier {
                neighborhood: new.name,
                multiplier: new.multiplier,
            });
        }
        check_overrides(&new.name, &new.overrides)?;

        let id = NeighborhoodId(self.neighborhoods.len() as u32);
        self.neighborhood_index.insert(key, id);
        self.neighborhoods.push(Neighborhood {
            id,
            city: new.city,
            name: new.name,
            multiplier: new.multiplier,
            overrides: new.overrides,
        });
        Ok(id)
    }

    /// Add a job title with its salary band.
    ///
    /// # Errors
    ///
    /// Rejects duplicate names and bands that are negative or out of order
    /// (`low <= mid <= high` must hold).
    pub fn add_job_title(&mut self, new: NewJobTitle) -> Result<JobTitleId, StoreError> {
        if self.job_index.contains_key(&new.name) {
            return Err(StoreError::DuplicateJobTitle(new.name));
        }
        if new.low < Decimal::ZERO || new.low > new.mid || new.mid > new.high {
            return Err(StoreError::InvalidSalaryBand { job: new.name });
        }

        let id = JobTitleId(self.jobs.len() as u32);
        self.job_index.insert(new.name.clone(), id);
        self.jobs.push(JobTitle {
            id,
            name: new.name,
            low: new.low,
            mid: new.mid,
            high: new.high,
        });
        Ok(id)
    }

    /// Freeze the validated tables into an immutable store.
    pub fn build(self) -> ReferenceStore {
        ReferenceStore {
            countries: self.countries,
            cities: self.cities,
            neighborhoods: self.neighborhoods,
            jobs: self.jobs,
            exchange: self.exchange,
            country_index: self.country_index,
            city_index: self.city_index,
            neighborhood_index: self.neighborhood_index,
            job_index: self.job_index,
        }
    }
}
