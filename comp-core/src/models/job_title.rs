use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::JobTitleId;

/// Seniority band within a job title's salary range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityLevel {
    Entry,
    Mid,
    Senior,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(Self::Entry),
            "mid" => Some(Self::Mid),
            "senior" => Some(Self::Senior),
            _ => None,
        }
    }
}

/// A job title with annual USD salary baselines pegged to the reference
/// city (COLI = 100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: JobTitleId,
    pub name: String,
    pub low: Decimal,
    pub mid: Decimal,
    pub high: Decimal,
}

impl JobTitle {
    /// Baseline annual USD salary for the given seniority band.
    pub fn baseline(&self, level: SeniorityLevel) -> Decimal {
        match level {
            SeniorityLevel::Entry => self.low,
            SeniorityLevel::Mid => self.mid,
            SeniorityLevel::Senior => self.high,
        }
    }
}

/// A job title not yet admitted to the store; the builder assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobTitle {
    pub name: String,
    pub low: Decimal,
    pub mid: Decimal,
    pub high: Decimal,
}
