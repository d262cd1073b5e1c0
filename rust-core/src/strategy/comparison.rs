use super::projection::{per_query, DailyCost};
use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

/// Signed difference between a baseline (A) and a candidate (B).
///
/// A positive difference means the baseline costs more, i.e. the candidate
/// saves that amount per day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub baseline: f64,
    pub candidate: f64,
    pub difference: f64,
}

impl StrategyComparison {
    pub fn between(baseline: f64, candidate: f64) -> Self {
        Self {
            baseline,
            candidate,
            difference: baseline - candidate,
        }
    }

    /// Difference as a percentage of the baseline.
    pub fn difference_pct(&self) -> Result<f64> {
        if self.baseline == 0.0 {
            return Err(CostError::DivisionByZero(
                "percentage difference against a zero-cost baseline",
            ));
        }
        Ok((self.difference / self.baseline) * 100.0)
    }

    pub fn annual_difference(&self, days_per_year: u32) -> f64 {
        self.difference * days_per_year as f64
    }

    pub fn difference_per_query(&self, queries_per_day: u64) -> Result<f64> {
        per_query(self.difference, queries_per_day)
    }

    pub fn candidate_is_cheaper(&self) -> bool {
        self.difference > 0.0
    }

    /// The same comparison seen from the candidate's side.
    pub fn reversed(&self) -> Self {
        Self::between(self.candidate, self.baseline)
    }
}

pub fn compare<A, B>(baseline: &A, candidate: &B) -> StrategyComparison
where
    A: DailyCost + ?Sized,
    B: DailyCost + ?Sized,
{
    StrategyComparison::between(baseline.daily_total(), candidate.daily_total())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_convention() {
        let cmp = StrategyComparison::between(10.0, 4.0);
        assert_eq!(cmp.difference, 6.0);
        assert!(cmp.candidate_is_cheaper());
        assert_eq!(cmp.difference_pct().unwrap(), 60.0);
        assert_eq!(cmp.annual_difference(365), 2190.0);
        assert_eq!(cmp.difference_per_query(3).unwrap(), 2.0);
    }

    #[test]
    fn test_antisymmetry() {
        let cmp = StrategyComparison::between(3.75, 1.2);
        assert_eq!(cmp.difference, -cmp.reversed().difference);
        assert!(!cmp.reversed().candidate_is_cheaper());
        assert!(cmp.reversed().difference_pct().unwrap() < 0.0);
    }

    #[test]
    fn test_zero_baseline() {
        let cmp = StrategyComparison::between(0.0, 2.0);
        assert_eq!(cmp.difference, -2.0);
        assert!(matches!(cmp.difference_pct(), Err(CostError::DivisionByZero(_))));
        assert!(cmp.difference_per_query(0).is_err());
    }
}
