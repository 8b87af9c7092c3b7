//! The engine facade: the purely functional surface exposed to rendering
//! and orchestration layers.
//!
//! An [`Engine`] borrows a frozen [`ReferenceStore`] and exposes id-based
//! compute calls. It holds no other state, performs no I/O, and every
//! method is referentially transparent, so one engine can serve any number
//! of concurrent callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::budget::{budget_tiers, BudgetError, BudgetTiers};
use crate::calculations::currency::{convert, ConvertError};
use crate::calculations::deductions::{deduction_breakdown, DeductionBreakdown};
use crate::calculations::location::{
    adjusted_salary, equivalent_salary, neighborhood_profile, NeighborhoodProfile,
};
use crate::calculations::solver::{NetSolver, SolverConfig, SolverError};
use crate::calculations::tax::progressive_tax;
use crate::models::{
    CityId, CountryId, CurrencyCode, JobTitleId, Neighborhood, NeighborhoodId, SeniorityLevel,
};
use crate::store::ReferenceStore;

/// Errors surfaced by engine calls.
///
/// Entity-lookup and conversion failures propagate immediately; numeric
/// edge cases never land here — they resolve to zero results inside the
/// calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl From<BudgetError> for EngineError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Convert(e) => Self::Convert(e),
            BudgetError::Solver(e) => Self::Solver(e),
        }
    }
}

/// A job title priced into one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSalaryProfile {
    /// Baseline salary scaled by the city's cost index, USD.
    pub adjusted_usd: Decimal,
    /// The adjusted salary in the city's local currency.
    pub local_gross: Decimal,
    pub currency: CurrencyCode,
    /// `1 - effective total deduction rate` at the local gross.
    pub take_home_rate: Decimal,
}

/// Facade over the reference store and the calculation pipeline.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    store: &'a ReferenceStore,
    solver_config: SolverConfig,
}

impl<'a> Engine<'a> {
    pub fn new(store: &'a ReferenceStore) -> Self {
        Self::with_solver_config(store, SolverConfig::default())
    }

    pub fn with_solver_config(store: &'a ReferenceStore, solver_config: SolverConfig) -> Self {
        Self {
            store,
            solver_config,
        }
    }

    pub fn store(&self) -> &ReferenceStore {
        self.store
    }

    /// The neighborhood, checked against the city it is being used with.
    /// Ids from `resolve_neighborhood(city, ..)` satisfy this by
    /// construction.
    fn scoped_neighborhood(
        &self,
        city: CityId,
        neighborhood: Option<NeighborhoodId>,
    ) -> Option<&'a Neighborhood> {
        neighborhood.map(|id| {
            let n = self.store.neighborhood(id);
            debug_assert_eq!(n.city, city, "neighborhood used with a foreign city");
            n
        })
    }

    /// Cost of Living Index for a city (100 = reference city).
    pub fn coli(&self, city: CityId) -> Decimal {
        self.store.city(city).coli
    }

    /// Cross-rate currency conversion through the anchor.
    pub fn convert_currency(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, EngineError> {
        Ok(convert(self.store.exchange_rates(), amount, from, to)?)
    }

    /// Progressive income tax on `gross` local income in a country.
    pub fn compute_tax(&self, gross: Decimal, country: CountryId) -> Decimal {
        progressive_tax(gross, &self.store.country(country).brackets)
    }

    /// Full tax-and-deduction breakdown for a (country, city, neighborhood)
    /// rule set.
    pub fn compute_deductions(
        &self,
        gross: Decimal,
        country: CountryId,
        city: CityId,
        neighborhood: Option<NeighborhoodId>,
    ) -> DeductionBreakdown {
        deduction_breakdown(
            gross,
            self.store.country(country),
            self.store.city(city),
            self.scoped_neighborhood(city, neighborhood),
        )
    }

    /// Effective total deduction rate at an arbitrary gross income.
    pub fn effective_rate(
        &self,
        gross: Decimal,
        country: CountryId,
        city: CityId,
        neighborhood: Option<NeighborhoodId>,
    ) -> Decimal {
        self.compute_deductions(gross, country, city, neighborhood)
            .total_rate
    }

    /// Reference-city baseline for a job, scaled by the city's cost index.
    /// Returned in USD.
    pub fn adjusted_salary(
        &self,
        job: JobTitleId,
        level: SeniorityLevel,
        city: CityId,
    ) -> Decimal {
        let baseline = self.store.job_title(job).baseline(level);
        adjusted_salary(baseline, self.store.city(city).coli)
    }

    /// Rescales a USD salary from one city's cost level to another's.
    pub fn equivalent_salary(&self, amount_usd: Decimal, from: CityId, to: CityId) -> Decimal {
        equivalent_salary(
            amount_usd,
            self.store.city(from).coli,
            self.store.city(to).coli,
        )
    }

    /// Derived rent and approximate cost index for a neighborhood.
    pub fn neighborhood_profile(&self, neighborhood: NeighborhoodId) -> NeighborhoodProfile {
        let n = self.store.neighborhood(neighborhood);
        neighborhood_profile(self.store.city(n.city), n)
    }

    /// The gross local salary whose net take-home equals `target_net`.
    ///
    /// The convergence tolerance is one US dollar expressed in the city's
    /// local currency.
    ///
    /// # Errors
    ///
    /// Conversion failures (USD or the city's currency missing from the
    /// rate table) and solver non-convergence.
    pub fn salary_for_net(
        &self,
        target_net: Decimal,
        country: CountryId,
        city: CityId,
        neighborhood: Option<NeighborhoodId>,
    ) -> Result<Decimal, EngineError> {
        let config = self.local_solver_config(city)?;
        let solver = NetSolver::with_config(
            config,
            self.store.country(country),
            self.store.city(city),
            self.scoped_neighborhood(city, neighborhood),
        );
        Ok(solver.solve(target_net)?)
    }

    /// Gross salaries for the three lifestyle tiers at a location.
    ///
    /// # Errors
    ///
    /// Conversion failures and solver non-convergence, as for
    /// [`salary_for_net`](Self::salary_for_net).
    pub fn budget_tiers(
        &self,
        city: CityId,
        neighborhood: Option<NeighborhoodId>,
    ) -> Result<BudgetTiers, EngineError> {
        let config = self.local_solver_config(city)?;
        let city_ref = self.store.city(city);
        Ok(budget_tiers(
            self.store.exchange_rates(),
            self.store.country(city_ref.country),
            city_ref,
            self.scoped_neighborhood(city, neighborhood),
            config,
        )?)
    }

    /// Prices a job title into a city: COLI-adjusted USD figure, local
    /// gross, and the take-home share after tax and deductions.
    ///
    /// # Errors
    ///
    /// Conversion failure when USD or the city's currency is missing from
    /// the rate table.
    pub fn job_salary_profile(
        &self,
        job: JobTitleId,
        level: SeniorityLevel,
        city: CityId,
    ) -> Result<JobSalaryProfile, EngineError> {
        let city_ref = self.store.city(city);
        let adjusted_usd = self.adjusted_salary(job, level, city);
        let local_gross =
            self.convert_currency(adjusted_usd, &CurrencyCode::usd(), &city_ref.currency)?;

        let take_home_rate = if local_gross > Decimal::ZERO {
            Decimal::ONE - self.effective_rate(local_gross, city_ref.country, city, None)
        } else {
            Decimal::ONE
        };

        Ok(JobSalaryProfile {
            adjusted_usd,
            local_gross,
            currency: city_ref.currency.clone(),
            take_home_rate,
        })
    }

    /// Solver parameters with the tolerance rebased to one US dollar in the
    /// city's local currency.
    fn local_solver_config(&self, city: CityId) -> Result<SolverConfig, EngineError> {
        let currency = &self.store.city(city).currency;
        let tolerance = self.convert_currency(
            self.solver_config.tolerance,
            &CurrencyCode::usd(),
            currency,
        )?;
        Ok(SolverConfig {
            tolerance,
            ..self.solver_config.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{
        DeductionOverride, DeductionRules, ExchangeRates, LivingCosts, NewCity, NewCountry,
        NewJobTitle, NewNeighborhood, OverrideBasis, SocialSecurityRule, TaxBracket,
    };
    use crate::store::ReferenceStoreBuilder;

    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn living_costs() -> LivingCosts {
        LivingCosts {
            groceries: dec!(350),
            utilities: dec!(200),
            transport: dec!(100),
            healthcare: dec!(300),
        }
    }

    /// Two jurisdictions: a flat-tax USD country and a progressive EUR
    /// country with capped social security and a surcharge.
    fn test_store() -> ReferenceStore {
        let rates = ExchangeRates::new(
            code("GBP"),
            [
                (code("GBP"), dec!(1.0)),
                (code("USD"), dec!(1.25)),
                (code("EUR"), dec!(1.25)),
            ],
        )
        .unwrap();
        let mut builder = ReferenceStoreBuilder::new(rates);

        let flatland = builder
            .add_country(NewCountry {
                name: "Flatland".to_string(),
                brackets: vec![TaxBracket::above_last(dec!(0.25))],
                deductions: DeductionRules::default(),
            })
            .unwrap();
        let steepland = builder
            .add_country(NewCountry {
                name: "Steepland".to_string(),
                brackets: vec![
                    TaxBracket::up_to(dec!(50000), dec!(0.10)),
                    TaxBracket::above_last(dec!(0.30)),
                ],
                deductions: DeductionRules {
                    social_security: Some(SocialSecurityRule {
                        rate: dec!(0.08),
                        cap: Some(dec!(60000)),
                        reduced_rate: Some(dec!(0.02)),
                    }),
                    surcharge_rate: Some(dec!(0.05)),
                },
            })
            .unwrap();

        let plainview = builder
            .add_city(NewCity {
                name: "Plainview".to_string(),
                country: flatland,
                currency: code("USD"),
                coli: dec!(100),
                rent_1br: dec!(2000),
                living_costs: living_costs(),
                region: "Test".to_string(),
                overrides: vec![],
            })
            .unwrap();
        let hillstadt = builder
            .add_city(NewCity {
                name: "Hillstadt".to_string(),
                country: steepland,
                currency: code("EUR"),
                coli: dec!(80),
                rent_1br: dec!(1500),
                living_costs: living_costs(),
                region: "Test".to_string(),
                overrides: vec![DeductionOverride {
                    label: "city tax".to_string(),
                    basis: OverrideBasis::PercentOfIncome(dec!(0.01)),
                }],
            })
            .unwrap();
        builder
            .add_neighborhood(NewNeighborhood {
                city: hillstadt,
                name: "Altberg".to_string(),
                multiplier: dec!(1.5),
                overrides: vec![DeductionOverride {
                    label: "district levy".to_string(),
                    basis: OverrideBasis::FlatAnnual(dec!(240)),
                }],
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
        builder
            .add_neighborhood(NewNeighborhood {
                city: plainview,
                name: "Lakeside".to_string(),
                multiplier: dec!(0.8),
                overrides: vec![],
            })
            .unwrap();

        builder.build()
    }

    #[test]
    fn coli_reads_straight_from_the_store() {
        let store = test_store();
        let engine = Engine::new(&store);
        let city = store.resolve_city("Hillstadt").unwrap();

        assert_eq!(engine.coli(city), dec!(80));
    }

    #[test]
    fn compute_tax_uses_the_country_schedule() {
        let store = test_store();
        let engine = Engine::new(&store);
        let country = store.resolve_country("Steepland").unwrap();

        // 50_000 * 10% + 30_000 * 30%.
        assert_eq!(engine.compute_tax(dec!(80000), country), dec!(14000.00));
    }

    #[test]
    fn compute_deductions_includes_city_and_neighborhood_entries() {
        let store = test_store();
        let engine = Engine::new(&store);
        let country = store.resolve_country("Steepland").unwrap();
        let city = store.resolve_city("Hillstadt").unwrap();
        let neighborhood = store.resolve_neighborhood(city, "Altberg").unwrap();

        let without = engine.compute_deductions(dec!(80000), country, city, None);
        let with = engine.compute_deductions(dec!(80000), country, city, Some(neighborhood));

        // The district levy is flat 240 on top of the city-level entries.
        assert_eq!(with.deductions - without.deductions, dec!(240.00));
        assert_eq!(with.income_tax, without.income_tax);
    }

    #[test]
    fn effective_rate_matches_the_breakdown() {
        let store = test_store();
        let engine = Engine::new(&store);
        let country = store.resolve_country("Flatland").unwrap();
        let city = store.resolve_city("Plainview").unwrap();

        let rate = engine.effective_rate(dec!(100000), country, city, None);

        assert_eq!(rate, dec!(0.25));
    }

    #[test]
    fn adjusted_salary_scales_by_city_coli() {
        let store = test_store();
        let engine = Engine::new(&store);
        let job = store.resolve_job_title("Software Engineer").unwrap();
        let hillstadt = store.resolve_city("Hillstadt").unwrap();

        let adjusted = engine.adjusted_salary(job, SeniorityLevel::Mid, hillstadt);

        assert_eq!(adjusted, dec!(112000.00)); // 140_000 * 0.8
    }

    #[test]
    fn equivalent_salary_uses_the_coli_ratio() {
        let store = test_store();
        let engine = Engine::new(&store);
        let plainview = store.resolve_city("Plainview").unwrap();
        let hillstadt = store.resolve_city("Hillstadt").unwrap();

        let equivalent = engine.equivalent_salary(dec!(100000), plainview, hillstadt);

        assert_eq!(equivalent, dec!(80000.00));
    }

    #[test]
    fn salary_for_net_round_trips_through_the_breakdown() {
        let store = test_store();
        let engine = Engine::new(&store);
        let country = store.resolve_country("Steepland").unwrap();
        let city = store.resolve_city("Hillstadt").unwrap();

        let target = dec!(60000);
        let gross = engine.salary_for_net(target, country, city, None).unwrap();
        let breakdown = engine.compute_deductions(gross, country, city, None);

        let gap = (breakdown.net(gross) - target).abs();
        assert!(gap <= dec!(1), "gap {gap} at gross {gross}");
    }

    #[test]
    fn budget_tiers_report_local_currency_and_comfortable_rate() {
        let store = test_store();
        let engine = Engine::new(&store);
        let city = store.resolve_city("Hillstadt").unwrap();
        let country = store.resolve_country("Steepland").unwrap();

        let tiers = engine.budget_tiers(city, None).unwrap();

        assert_eq!(tiers.currency, code("EUR"));
        assert!(tiers.get_by < tiers.comfortable);
        assert!(tiers.comfortable < tiers.live_well);
        assert_eq!(
            tiers.effective_rate_comfortable,
            engine.effective_rate(tiers.comfortable, country, city, None)
        );
    }

    #[test]
    fn budget_tiers_with_neighborhood_cost_more() {
        let store = test_store();
        let engine = Engine::new(&store);
        let city = store.resolve_city("Hillstadt").unwrap();
        let neighborhood = store.resolve_neighborhood(city, "Altberg").unwrap();

        let base = engine.budget_tiers(city, None).unwrap();
        let premium = engine.budget_tiers(city, Some(neighborhood)).unwrap();

        assert!(premium.monthly_rent > base.monthly_rent);
        assert!(premium.get_by > base.get_by);
    }

    #[test]
    fn job_salary_profile_combines_adjustment_conversion_and_deductions() {
        let store = test_store();
        let engine = Engine::new(&store);
        let job = store.resolve_job_title("Software Engineer").unwrap();
        let city = store.resolve_city("Hillstadt").unwrap();

        let profile = engine
            .job_salary_profile(job, SeniorityLevel::Mid, city)
            .unwrap();

        assert_eq!(profile.adjusted_usd, dec!(112000.00));
        // USD and EUR share the same anchor rate in the test table.
        assert_eq!(profile.local_gross, dec!(112000.00));
        assert_eq!(profile.currency, code("EUR"));
        assert!(profile.take_home_rate > Decimal::ZERO);
        assert!(profile.take_home_rate < Decimal::ONE);
    }

    #[test]
    fn convert_currency_propagates_unknown_codes() {
        let store = test_store();
        let engine = Engine::new(&store);

        let result = engine.convert_currency(dec!(10), &code("USD"), &code("CHF"));

        assert_eq!(
            result,
            Err(EngineError::Convert(ConvertError::UnknownCurrency(code(
                "CHF"
            ))))
        );
    }

    #[test]
    fn engine_calls_are_referentially_transparent() {
        let store = test_store();
        let engine = Engine::new(&store);
        let country = store.resolve_country("Steepland").unwrap();
        let city = store.resolve_city("Hillstadt").unwrap();

        let first = engine.compute_deductions(dec!(77777.77), country, city, None);
        let second = engine.compute_deductions(dec!(77777.77), country, city, None);

        assert_eq!(first, second);
        assert_eq!(
            engine.budget_tiers(city, None).unwrap(),
            engine.budget_tiers(city, None).unwrap()
        );
    }
}
