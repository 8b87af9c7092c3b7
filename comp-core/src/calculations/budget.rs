//! Lifestyle budget tiers and the gross salaries that fund them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{City, Country, CurrencyCode, ExchangeRates, Neighborhood};

use super::common::round_half_up;
use super::currency::{convert, ConvertError};
use super::deductions::deduction_breakdown;
use super::location::neighborhood_profile;
use super::solver::{NetSolver, SolverConfig, SolverError};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
/// Essentials as a share of net income in the "comfortable" tier (the
/// 50/30/20 budgeting rule).
const COMFORTABLE_ESSENTIALS_SHARE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// Essentials as a share of net income in the "live well" tier.
const LIVE_WELL_ESSENTIALS_SHARE: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

/// Errors raised while deriving budget tiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Gross salaries required for three lifestyle tiers, in local currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTiers {
    /// Net exactly covers rent and essentials; zero margin.
    pub get_by: Decimal,
    /// Rent and essentials are 50% of net; 30% wants, 20% savings implied.
    pub comfortable: Decimal,
    /// Rent and essentials are 40% of net; a larger margin.
    pub live_well: Decimal,
    pub currency: CurrencyCode,
    /// Monthly one-bedroom rent in local currency (neighborhood-adjusted
    /// when a neighborhood is in scope).
    pub monthly_rent: Decimal,
    /// Monthly living costs (groceries, utilities, transport, healthcare)
    /// in local currency; rent is reported separately.
    pub monthly_essentials: Decimal,
    /// Effective total deduction rate evaluated at the comfortable tier's
    /// gross salary, for display.
    pub effective_rate_comfortable: Decimal,
}

/// Derives the three tier targets from a location's living costs and solves
/// each one for the gross salary that funds it.
///
/// The get-by target is the (neighborhood-adjusted) rent plus the city's
/// living-cost breakdown, priced in USD and converted to the city's local
/// currency before the annual net targets are formed. Each tier target is
/// passed independently to the net-target solver.
pub fn budget_tiers(
    rates: &ExchangeRates,
    country: &Country,
    city: &City,
    neighborhood: Option<&Neighborhood>,
    solver_config: SolverConfig,
) -> Result<BudgetTiers, BudgetError> {
    let rent_usd = match neighborhood {
        Some(neighborhood) => neighborhood_profile(city, neighborhood).rent_1br,
        None => city.rent_1br,
    };
    let living_usd = city.living_costs.monthly_total();

    let usd = CurrencyCode::usd();
    let monthly_rent = convert(rates, rent_usd, &usd, &city.currency)?;
    let monthly_essentials = convert(rates, living_usd, &usd, &city.currency)?;

    let annual_get_by = (monthly_rent + monthly_essentials) * MONTHS_PER_YEAR;
    let annual_comfortable = annual_get_by / COMFORTABLE_ESSENTIALS_SHARE;
    let annual_live_well = annual_get_by / LIVE_WELL_ESSENTIALS_SHARE;

    let solver = NetSolver::with_config(solver_config, country, city, neighborhood);
    let get_by = solver.solve(annual_get_by)?;
    let comfortable = solver.solve(annual_comfortable)?;
    let live_well = solver.solve(annual_live_well)?;

    let effective_rate_comfortable =
        deduction_breakdown(comfortable, country, city, neighborhood).total_rate;

    Ok(BudgetTiers {
        get_by,
        comfortable,
        live_well,
        currency: city.currency.clone(),
        monthly_rent: round_half_up(monthly_rent),
        monthly_essentials: round_half_up(monthly_essentials),
        effective_rate_comfortable,
    })
}
