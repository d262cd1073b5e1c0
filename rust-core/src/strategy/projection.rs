/// Projected daily cost of a strategy

use crate::cost::CostResult;
use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

pub(crate) fn per_query(total: f64, queries: u64) -> Result<f64> {
    if queries == 0 {
        return Err(CostError::DivisionByZero("cost per query with zero queries"));
    }
    Ok(total / queries as f64)
}

/// Anything with a daily cost that can be annualised and split per query.
pub trait DailyCost {
    fn daily_total(&self) -> f64;

    fn queries_per_day(&self) -> u64;

    fn annual_cost(&self, days_per_year: u32) -> f64 {
        self.daily_total() * days_per_year as f64
    }

    fn cost_per_query(&self) -> Result<f64> {
        per_query(self.daily_total(), self.queries_per_day())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleModelProjection {
    pub model: String,
    pub queries_per_day: u64,
    pub cost: CostResult,
}

impl DailyCost for SingleModelProjection {
    fn daily_total(&self) -> f64 {
        self.cost.total_cost
    }

    fn queries_per_day(&self) -> u64 {
        self.queries_per_day
    }
}

/// Routing overhead: the classifier sees every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierCost {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: CostResult,
}

/// A specialist's share of the day.
///
/// Input cost covers the full day's input; output cost only the queries this
/// specialist answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistCost {
    pub model: String,
    pub percentage: u32,
    pub queries: u64,
    pub cost: CostResult,
}

impl SpecialistCost {
    pub fn cost_per_query(&self) -> Result<f64> {
        per_query(self.cost.total_cost, self.queries)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiModelProjection {
    pub queries_per_day: u64,
    pub classifier: ClassifierCost,
    pub specialists: Vec<SpecialistCost>,
    pub total_cost: f64,
}

impl MultiModelProjection {
    pub(crate) fn new(
        queries_per_day: u64,
        classifier: ClassifierCost,
        specialists: Vec<SpecialistCost>,
    ) -> Self {
        let specialist_total: f64 = specialists.iter().map(|s| s.cost.total_cost).sum();
        let total_cost = classifier.cost.total_cost + specialist_total;
        Self {
            queries_per_day,
            classifier,
            specialists,
            total_cost,
        }
    }
}

impl DailyCost for MultiModelProjection {
    fn daily_total(&self) -> f64 {
        self.total_cost
    }

    fn queries_per_day(&self) -> u64 {
        self.queries_per_day
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    Single(SingleModelProjection),
    Multi(MultiModelProjection),
}

impl DailyCost for Projection {
    fn daily_total(&self) -> f64 {
        match self {
            Projection::Single(p) => p.daily_total(),
            Projection::Multi(p) => p.daily_total(),
        }
    }

    fn queries_per_day(&self) -> u64 {
        match self {
            Projection::Single(p) => p.queries_per_day(),
            Projection::Multi(p) => p.queries_per_day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics() {
        let projection = SingleModelProjection {
            model: "gpt-4".to_string(),
            queries_per_day: 100,
            cost: CostResult::new(1.5, 4.5),
        };
        assert_eq!(projection.daily_total(), 6.0);
        assert_eq!(projection.annual_cost(365), 2190.0);
        assert!((projection.cost_per_query().unwrap() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_zero_queries_is_division_by_zero() {
        let specialist = SpecialistCost {
            model: "gpt-4".to_string(),
            percentage: 0,
            queries: 0,
            cost: CostResult::new(1.0, 0.0),
        };
        assert!(matches!(
            specialist.cost_per_query(),
            Err(CostError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_multi_total_sums_parts() {
        let classifier = ClassifierCost {
            model: "c".to_string(),
            input_tokens: 100,
            output_tokens: 50,
            cost: CostResult::new(0.25, 0.25),
        };
        let specialists = vec![
            SpecialistCost {
                model: "a".to_string(),
                percentage: 50,
                queries: 1,
                cost: CostResult::new(1.0, 1.0),
            },
            SpecialistCost {
                model: "b".to_string(),
                percentage: 50,
                queries: 1,
                cost: CostResult::new(2.0, 0.5),
            },
        ];
        let projection = MultiModelProjection::new(2, classifier, specialists);
        assert_eq!(projection.total_cost, 5.0);
        assert_eq!(Projection::Multi(projection).cost_per_query().unwrap(), 2.5);
    }
}
