//! Compensation calculations.
//!
//! Pure functions over the reference models: currency conversion,
//! progressive tax, mandatory deductions, cost-of-living adjustment, the
//! inverse net-target solver, and the budget tier model built on top of it.
//! Nothing in here does I/O or holds state; identical inputs always produce
//! identical outputs.

pub mod budget;
pub mod common;
pub mod currency;
pub mod deductions;
pub mod location;
pub mod solver;
pub mod tax;

pub use budget::{budget_tiers, BudgetError, BudgetTiers};
pub use currency::{convert, ConvertError};
pub use deductions::{deduction_breakdown, DeductionBreakdown};
pub use location::{
    adjusted_salary, equivalent_salary, neighborhood_profile, NeighborhoodProfile,
};
pub use solver::{NetSolver, SolverConfig, SolverError};
pub use tax::progressive_tax;
