use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use comp_core::{
    CityId, CurrencyCode, DeductionOverride, DeductionRules, ExchangeRates, LivingCosts,
    NewCity, NewCountry, NewJobTitle, NewNeighborhood, OverrideBasis, ReferenceStore,
    ReferenceStoreBuilder, SocialSecurityRule, StoreError, TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading reference data from CSV.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("invalid override scope '{0}' (expected 'city' or 'neighborhood')")]
    InvalidScope(String),

    #[error("invalid override kind '{0}' (expected 'flat' or 'percent')")]
    InvalidKind(String),

    #[error("neighborhood-scoped override for city '{0}' is missing the neighborhood name")]
    MissingNeighborhood(String),

    #[error("record references unknown country '{0}'")]
    UnknownCountry(String),

    #[error("record references unknown city '{0}'")]
    UnknownCity(String),

    #[error("override references unknown neighborhood '{name}' in city '{city}'")]
    UnknownNeighborhood { city: String, name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// A row of `countries.csv`: jurisdiction-level deduction rules.
///
/// All rates are fractions (0.08 = 8%); empty cells mean "not configured".
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountryRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ss_rate: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ss_cap: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ss_reduced_rate: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub surcharge_rate: Option<Decimal>,
}

/// A row of `tax_brackets.csv`. Rows for one country must appear in
/// ascending bound order; an empty `upper` marks the unbounded top bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub country: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `cities.csv`. Monetary columns are monthly USD figures.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CityRecord {
    pub name: String,
    pub country: String,
    pub currency: String,
    pub coli: Decimal,
    pub rent_1br: Decimal,
    pub groceries: Decimal,
    pub utilities: Decimal,
    pub transport: Decimal,
    pub healthcare: Decimal,
    pub region: String,
}

/// A row of `neighborhoods.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NeighborhoodRecord {
    pub city: String,
    pub name: String,
    pub multiplier: Decimal,
}

/// A row of `deduction_overrides.csv`.
///
/// `scope` is `city` or `neighborhood`; `kind` is `flat` (annual amount in
/// local currency) or `percent` (fraction of gross income).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OverrideRecord {
    pub scope: String,
    pub city: String,
    #[serde(deserialize_with = "deserialize_optional_string")]
    pub neighborhood: Option<String>,
    pub label: String,
    pub kind: String,
    pub value: Decimal,
}

/// A row of `job_titles.csv`: annual USD baselines for the reference city.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobTitleRecord {
    pub name: String,
    pub low: Decimal,
    pub mid: Decimal,
    pub high: Decimal,
}

/// A row of `exchange_rates.csv`: rate relative to the anchor currency.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExchangeRateRecord {
    pub currency: String,
    pub rate: Decimal,
}

fn parse_records<R, T>(reader: R) -> Result<Vec<T>, LoaderError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|err| LoaderError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// All parsed reference tables, not yet validated or cross-linked.
///
/// Parsing and store construction are split so that callers can assemble a
/// `DataSet` from any mix of sources (files, embedded fixtures, generated
/// records) before [`build_store`](Self::build_store) runs the full
/// validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub countries: Vec<CountryRecord>,
    pub brackets: Vec<BracketRecord>,
    pub cities: Vec<CityRecord>,
    pub neighborhoods: Vec<NeighborhoodRecord>,
    pub overrides: Vec<OverrideRecord>,
    pub job_titles: Vec<JobTitleRecord>,
    pub exchange_rates: Vec<ExchangeRateRecord>,
}

impl DataSet {
    pub fn parse_countries<R: Read>(reader: R) -> Result<Vec<CountryRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_cities<R: Read>(reader: R) -> Result<Vec<CityRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_neighborhoods<R: Read>(reader: R) -> Result<Vec<NeighborhoodRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_overrides<R: Read>(reader: R) -> Result<Vec<OverrideRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_job_titles<R: Read>(reader: R) -> Result<Vec<JobTitleRecord>, LoaderError> {
        parse_records(reader)
    }

    pub fn parse_exchange_rates<R: Read>(
        reader: R,
    ) -> Result<Vec<ExchangeRateRecord>, LoaderError> {
        parse_records(reader)
    }

    /// Reads the seven reference CSVs from a directory by their
    /// conventional names.
    pub fn from_dir(dir: &Path) -> Result<Self, LoaderError> {
        Ok(Self {
            countries: Self::parse_countries(open(&dir.join("countries.csv"))?)?,
            brackets: Self::parse_brackets(open(&dir.join("tax_brackets.csv"))?)?,
            cities: Self::parse_cities(open(&dir.join("cities.csv"))?)?,
            neighborhoods: Self::parse_neighborhoods(open(&dir.join("neighborhoods.csv"))?)?,
            overrides: Self::parse_overrides(open(&dir.join("deduction_overrides.csv"))?)?,
            job_titles: Self::parse_job_titles(open(&dir.join("job_titles.csv"))?)?,
            exchange_rates: Self::parse_exchange_rates(open(&dir.join("exchange_rates.csv"))?)?,
        })
    }

    /// Cross-links the parsed records and freezes them into a validated
    /// [`ReferenceStore`].
    ///
    /// `anchor` names the currency the exchange-rate table is expressed in.
    ///
    /// # Errors
    ///
    /// Unknown country/city references, malformed override rows, and every
    /// invariant the store builder enforces (bracket ordering, positive
    /// indices and multipliers, duplicate names, unknown currencies).
    pub fn build_store(&self, anchor: &str) -> Result<ReferenceStore, LoaderError> {
        let exchange = ExchangeRates::new(
            CurrencyCode::new(anchor),
            self.exchange_rates
                .iter()
                .map(|r| (CurrencyCode::new(&r.currency), r.rate)),
        )
        .map_err(StoreError::from)?;
        let mut builder = ReferenceStoreBuilder::new(exchange);

        let (city_overrides, neighborhood_overrides) = self.grouped_overrides()?;

        let mut country_ids = HashMap::new();
        for record in &self.countries {
            let brackets = self
                .brackets
                .iter()
                .filter(|b| b.country == record.name)
                .map(|b| TaxBracket {
                    upper: b.upper,
                    rate: b.rate,
                })
                .collect();
            let id = builder.add_country(NewCountry {
                name: record.name.clone(),
                brackets,
                deductions: DeductionRules {
                    social_security: record.ss_rate.map(|rate| SocialSecurityRule {
                        rate,
                        cap: record.ss_cap,
                        reduced_rate: record.ss_reduced_rate,
                    }),
                    surcharge_rate: record.surcharge_rate,
                },
            })?;
            country_ids.insert(record.name.clone(), id);
        }

        for record in &self.brackets {
            if !country_ids.contains_key(&record.country) {
                return Err(LoaderError::UnknownCountry(record.country.clone()));
            }
        }

        let mut city_ids: HashMap<String, CityId> = HashMap::new();
        for record in &self.cities {
            let country = *country_ids
                .get(&record.country)
                .ok_or_else(|| LoaderError::UnknownCountry(record.country.clone()))?;
            let id = builder.add_city(NewCity {
                name: record.name.clone(),
                country,
                currency: CurrencyCode::new(&record.currency),
                coli: record.coli,
                rent_1br: record.rent_1br,
                living_costs: LivingCosts {
                    groceries: record.groceries,
                    utilities: record.utilities,
                    transport: record.transport,
                    healthcare: record.healthcare,
                },
                region: record.region.clone(),
                overrides: city_overrides
                    .get(record.name.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })?;
            city_ids.insert(record.name.clone(), id);
        }

        for record in &self.neighborhoods {
            let city = *city_ids
                .get(&record.city)
                .ok_or_else(|| LoaderError::UnknownCity(record.city.clone()))?;
            builder.add_neighborhood(NewNeighborhood {
                city,
                name: record.name.clone(),
                multiplier: record.multiplier,
                overrides: neighborhood_overrides
                    .get(&(record.city.clone(), record.name.clone()))
                    .cloned()
                    .unwrap_or_default(),
            })?;
        }

        // Every override row must land on a real scope; a misspelled target
        // would otherwise drop a levy without a trace.
        let neighborhood_names: HashSet<(&str, &str)> = self
            .neighborhoods
            .iter()
            .map(|n| (n.city.as_str(), n.name.as_str()))
            .collect();
        for record in &self.overrides {
            if !city_ids.contains_key(&record.city) {
                return Err(LoaderError::UnknownCity(record.city.clone()));
            }
            if record.scope == "neighborhood" {
                if let Some(name) = &record.neighborhood {
                    if !neighborhood_names.contains(&(record.city.as_str(), name.as_str())) {
                        return Err(LoaderError::UnknownNeighborhood {
                            city: record.city.clone(),
                            name: name.clone(),
                        });
                    }
                }
            }
        }

        for record in &self.job_titles {
            builder.add_job_title(NewJobTitle {
                name: record.name.clone(),
                low: record.low,
                mid: record.mid,
                high: record.high,
            })?;
        }

        Ok(builder.build())
    }

    /// Splits override rows into per-city and per-neighborhood groups,
    /// rejecting malformed scope/kind values up front.
    #[allow(clippy::type_complexity)]
    fn grouped_overrides(
        &self,
    ) -> Result<
        (
            HashMap<&str, Vec<DeductionOverride>>,
            HashMap<(String, String), Vec<DeductionOverride>>,
        ),
        LoaderError,
    > {
        let mut city_overrides: HashMap<&str, Vec<DeductionOverride>> = HashMap::new();
        let mut neighborhood_overrides: HashMap<(String, String), Vec<DeductionOverride>> =
            HashMap::new();

        for record in &self.overrides {
            let basis = match record.kind.as_str() {
                "flat" => OverrideBasis::FlatAnnual(record.value),
                "percent" => OverrideBasis::PercentOfIncome(record.value),
                other => return Err(LoaderError::InvalidKind(other.to_string())),
            };
            let entry = DeductionOverride {
                label: record.label.clone(),
                basis,
            };
            match record.scope.as_str() {
                "city" => city_overrides
                    .entry(record.city.as_str())
                    .or_default()
                    .push(entry),
                "neighborhood" => {
                    let name = record.neighborhood.clone().ok_or_else(|| {
                        LoaderError::MissingNeighborhood(record.city.clone())
                    })?;
                    neighborhood_overrides
                        .entry((record.city.clone(), name))
                        .or_default()
                        .push(entry);
                }
                other => return Err(LoaderError::InvalidScope(other.to_string())),
            }
        }

        Ok((city_overrides, neighborhood_overrides))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_brackets_reads_optional_upper_bound() {
        let csv = "country,upper,rate\nTestland,50000,0.10\nTestland,,0.30\n";

        let records = DataSet::parse_brackets(csv.as_bytes()).unwrap();

        assert_eq!(
            records,
            vec![
                BracketRecord {
                    country: "Testland".to_string(),
                    upper: Some(dec!(50000)),
                    rate: dec!(0.10),
                },
                BracketRecord {
                    country: "Testland".to_string(),
                    upper: None,
                    rate: dec!(0.30),
                },
            ]
        );
    }

    #[test]
    fn parse_countries_reads_empty_cells_as_none() {
        let csv = "name,ss_rate,ss_cap,ss_reduced_rate,surcharge_rate\n\
                   Testland,0.08,60000,0.02,\n\
                   Freeland,,,,\n";

        let records = DataSet::parse_countries(csv.as_bytes()).unwrap();

        assert_eq!(records[0].ss_cap, Some(dec!(60000)));
        assert_eq!(records[0].surcharge_rate, None);
        assert_eq!(records[1].ss_rate, None);
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        let csv = "country,upper,rate\nTestland,abc,0.10\n";

        let result = DataSet::parse_brackets(csv.as_bytes());

        assert!(matches!(result, Err(LoaderError::CsvParse(_))));
    }

    #[test]
    fn build_store_rejects_bracket_for_unknown_country() {
        let data = DataSet {
            brackets: vec![BracketRecord {
                country: "Atlantis".to_string(),
                upper: None,
                rate: dec!(0.10),
            }],
            exchange_rates: vec![ExchangeRateRecord {
                currency: "USD".to_string(),
                rate: dec!(1),
            }],
            ..DataSet::default()
        };

        let result = data.build_store("USD");

        assert!(matches!(result, Err(LoaderError::UnknownCountry(name)) if name == "Atlantis"));
    }

    #[test]
    fn build_store_rejects_unknown_override_kind() {
        let data = DataSet {
            countries: vec![CountryRecord {
                name: "Testland".to_string(),
                ss_rate: None,
                ss_cap: None,
                ss_reduced_rate: None,
                surcharge_rate: None,
            }],
            overrides: vec![OverrideRecord {
                scope: "city".to_string(),
                city: "Testville".to_string(),
                neighborhood: None,
                label: "mystery levy".to_string(),
                kind: "quadratic".to_string(),
                value: dec!(0.1),
            }],
            exchange_rates: vec![ExchangeRateRecord {
                currency: "USD".to_string(),
                rate: dec!(1),
            }],
            ..DataSet::default()
        };

        let result = data.build_store("USD");

        assert!(matches!(result, Err(LoaderError::InvalidKind(kind)) if kind == "quadratic"));
    }

    #[test]
    fn build_store_rejects_override_for_unknown_neighborhood() {
        let data = DataSet {
            countries: vec![CountryRecord {
                name: "Testland".to_string(),
                ss_rate: None,
                ss_cap: None,
                ss_reduced_rate: None,
                surcharge_rate: None,
            }],
            cities: vec![CityRecord {
                name: "Testville".to_string(),
                country: "Testland".to_string(),
                currency: "USD".to_string(),
                coli: dec!(100),
                rent_1br: dec!(2000),
                groceries: dec!(350),
                utilities: dec!(200),
                transport: dec!(100),
                healthcare: dec!(300),
                region: "Test".to_string(),
            }],
            neighborhoods: vec![NeighborhoodRecord {
                city: "Testville".to_string(),
                name: "Eastside".to_string(),
                multiplier: dec!(1.2),
            }],
            overrides: vec![OverrideRecord {
                scope: "neighborhood".to_string(),
                city: "Testville".to_string(),
                neighborhood: Some("Eastide".to_string()),
                label: "district levy".to_string(),
                kind: "flat".to_string(),
                value: dec!(600),
            }],
            exchange_rates: vec![ExchangeRateRecord {
                currency: "USD".to_string(),
                rate: dec!(1),
            }],
            ..DataSet::default()
        };

        let result = data.build_store("USD");

        assert!(matches!(
            result,
            Err(LoaderError::UnknownNeighborhood { city, name })
                if city == "Testville" && name == "Eastide"
        ));
    }

    #[test]
    fn build_store_rejects_override_for_unknown_city() {
        let data = DataSet {
            overrides: vec![OverrideRecord {
                scope: "city".to_string(),
                city: "Atlantis".to_string(),
                neighborhood: None,
                label: "sunken tax".to_string(),
                kind: "flat".to_string(),
                value: dec!(100),
            }],
            exchange_rates: vec![ExchangeRateRecord {
                currency: "USD".to_string(),
                rate: dec!(1),
            }],
            ..DataSet::default()
        };

        let result = data.build_store("USD");

        assert!(matches!(result, Err(LoaderError::UnknownCity(name)) if name == "Atlantis"));
    }
}
