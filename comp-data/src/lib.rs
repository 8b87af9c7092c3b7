//! CSV reference-data loading for the compensation engine.
//!
//! Parses the seven reference tables (countries, tax brackets, cities,
//! neighborhoods, deduction overrides, job titles, exchange rates) into
//! typed records, cross-links them by name, and hands them to the
//! `comp-core` store builder for validation.

pub mod loader;

pub use loader::{
    BracketRecord, CityRecord, CountryRecord, DataSet, ExchangeRateRecord, JobTitleRecord,
    LoaderError, NeighborhoodRecord, OverrideRecord,
};
