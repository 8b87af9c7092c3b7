//! Inverse solver: the gross income that yields a target net income.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::models::{City, Country, Neighborhood};

use super::common::round_half_up;
use super::deductions::deduction_breakdown;

/// Errors raised by the net-target solver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// The final estimate missed the target by more than the tolerance.
    ///
    /// The bisection interval is `[target, target * upper_bound_factor]`;
    /// a jurisdiction whose effective deduction rate pushes the required
    /// gross beyond that upper bound can never reach the target, and a
    /// fixed iteration count alone would silently return the bound. The
    /// post-condition check turns that into an explicit failure.
    #[error(
        "solver did not converge: target net {target_net}, best gross {gross}, \
         net gap {net_gap} exceeds tolerance {tolerance}"
    )]
    DidNotConverge {
        target_net: Decimal,
        gross: Decimal,
        net_gap: Decimal,
        tolerance: Decimal,
    },
}

/// Tuning parameters for the bisection search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Fixed number of bisection steps. 50 halvings shrink the interval by
    /// 2^50, far below one cent for any realistic salary range.
    pub iterations: u32,
    /// Upper search bound as a multiple of the target net. The default of 3
    /// assumes no jurisdiction takes an effective ~67% or more.
    pub upper_bound_factor: Decimal,
    /// Maximum acceptable |net - target| at the final gross, in local
    /// currency units.
    pub tolerance: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            upper_bound_factor: Decimal::from(3),
            tolerance: Decimal::ONE,
        }
    }
}

impl SolverConfig {
    /// Default search parameters with a jurisdiction-specific tolerance.
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

/// Bisection solver for "what gross salary yields this net income" under
/// one (country, city, neighborhood) rule set.
///
/// Net income is strictly increasing in gross income for any valid rule
/// set (marginal rates are below 100%), so bisection on
/// `[target, target * upper_bound_factor]` converges whenever the answer
/// lies inside the interval. The iteration count is fixed rather than
/// epsilon-checked; the explicit post-condition catches the cases the
/// interval cannot cover.
#[derive(Debug, Clone)]
pub struct NetSolver<'a> {
    config: SolverConfig,
    country: &'a Country,
    city: &'a City,
    neighborhood: Option<&'a Neighborhood>,
}

impl<'a> NetSolver<'a> {
    pub fn new(
        country: &'a Country,
        city: &'a City,
        neighborhood: Option<&'a Neighborhood>,
    ) -> Self {
        Self::with_config(SolverConfig::default(), country, city, neighborhood)
    }

    pub fn with_config(
        config: SolverConfig,
        country: &'a Country,
        city: &'a City,
        neighborhood: Option<&'a Neighborhood>,
    ) -> Self {
        Self {
            config,
            country,
            city,
            neighborhood,
        }
    }

    /// Net take-home at a candidate gross income.
    fn net_at(&self, gross: Decimal) -> Decimal {
        deduction_breakdown(gross, self.country, self.city, self.neighborhood).net(gross)
    }

    /// Solves for the gross income whose net equals `target_net`, in local
    /// currency.
    ///
    /// A non-positive target resolves to zero gross — a degenerate input,
    /// not a failure.
    ///
    /// # Errors
    ///
    /// [`SolverError::DidNotConverge`] when the final estimate's net is off
    /// by more than the configured tolerance.
    pub fn solve(&self, target_net: Decimal) -> Result<Decimal, SolverError> {
        if target_net <= Decimal::ZERO {
            if target_net < Decimal::ZERO {
                warn!(%target_net, "non-positive net target; gross resolves to zero");
            }
            return Ok(Decimal::ZERO);
        }

        let mut lo = target_net;
        let mut hi = target_net * self.config.upper_bound_factor;

        for _ in 0..self.config.iterations {
            let mid = (lo + hi) / Decimal::TWO;
            if self.net_at(mid) < target_net {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let gross = round_half_up((lo + hi) / Decimal::TWO);
        let net_gap = (self.net_at(gross) - target_net).abs();
        if net_gap > self.config.tolerance {
            return Err(SolverError::DidNotConverge {
                target_net,
                gross,
                net_gap,
                tolerance: self.config.tolerance,
            });
        }

        Ok(gross)
    }
}
