pub mod allocation;
pub mod comparison;
pub mod projection;
pub mod usage;

pub use allocation::{Allocation, AllocationBuilder, MultiModelStrategy};
pub use comparison::{compare, StrategyComparison};
pub use projection::{
    ClassifierCost, DailyCost, MultiModelProjection, Projection, SingleModelProjection,
    SpecialistCost,
};
pub use usage::UsagePattern;

use crate::config::ComparatorSettings;
use crate::cost::CostCalculator;
use crate::error::{CostError, Result};
use crate::log_projection;
use serde::{Deserialize, Serialize};

/// A way of serving the day's traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Single { model: String },
    Multi(MultiModelStrategy),
}

impl Strategy {
    pub fn single(model: impl Into<String>) -> Self {
        Strategy::Single {
            model: model.into(),
        }
    }
}

/// Projects strategies onto a usage pattern and compares them.
#[derive(Debug, Clone)]
pub struct StrategyComparator {
    calculator: CostCalculator,
    settings: ComparatorSettings,
}

impl StrategyComparator {
    pub fn new(calculator: CostCalculator, settings: ComparatorSettings) -> Self {
        Self {
            calculator,
            settings,
        }
    }

    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }

    pub fn settings(&self) -> &ComparatorSettings {
        &self.settings
    }

    pub fn project_single(&self, model: &str, usage: &UsagePattern) -> Result<SingleModelProjection> {
        usage.validate()?;
        let cost = self.calculator.calculate_cost(
            model,
            usage.daily_input_tokens()?,
            usage.daily_output_tokens()?,
        )?;

        log_projection!(debug, model, daily_total = cost.total_cost, "Single model projection");

        Ok(SingleModelProjection {
            model: model.to_string(),
            queries_per_day: usage.queries_per_day,
            cost,
        })
    }

    pub fn project_multi(
        &self,
        strategy: &MultiModelStrategy,
        usage: &UsagePattern,
    ) -> Result<MultiModelProjection> {
        usage.validate()?;
        strategy.validate(&self.settings)?;

        let daily_input = usage.daily_input_tokens()?;
        let output_per_query = usage.output_tokens_per_query()?;

        let specialists = strategy
            .allocations
            .iter()
            .map(|allocation| -> Result<SpecialistCost> {
                let queries = allocation.queries(usage.queries_per_day)?;
                let output_tokens = output_per_query.checked_mul(queries).ok_or_else(|| {
                    CostError::InvalidUsagePattern(format!(
                        "output tokens for {} overflow: {} tokens * {} queries",
                        allocation.model, output_per_query, queries
                    ))
                })?;
                let cost =
                    self.calculator
                        .calculate_cost(&allocation.model, daily_input, output_tokens)?;
                Ok(SpecialistCost {
                    model: allocation.model.clone(),
                    percentage: allocation.percentage,
                    queries,
                    cost,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let classifier_input =
            usage.per_day(self.settings.classifier_input_tokens, "classifier input tokens")?;
        let classifier_output =
            usage.per_day(self.settings.classifier_output_tokens, "classifier output tokens")?;
        let classifier = ClassifierCost {
            model: strategy.classifier.clone(),
            input_tokens: classifier_input,
            output_tokens: classifier_output,
            cost: self.calculator.calculate_cost(
                &strategy.classifier,
                classifier_input,
                classifier_output,
            )?,
        };

        let projection = MultiModelProjection::new(usage.queries_per_day, classifier, specialists);

        log_projection!(
            debug,
            classifier = %strategy.classifier,
            specialists = projection.specialists.len(),
            daily_total = projection.total_cost,
            "Multi-model projection"
        );

        Ok(projection)
    }

    pub fn project(&self, strategy: &Strategy, usage: &UsagePattern) -> Result<Projection> {
        match strategy {
            Strategy::Single { model } => self.project_single(model, usage).map(Projection::Single),
            Strategy::Multi(multi) => self.project_multi(multi, usage).map(Projection::Multi),
        }
    }

    /// Project both strategies and compare them, `baseline` first.
    pub fn compare(
        &self,
        baseline: &Strategy,
        candidate: &Strategy,
        usage: &UsagePattern,
    ) -> Result<(Projection, Projection, StrategyComparison)> {
        let a = self.project(baseline, usage)?;
        let b = self.project(candidate, usage)?;
        let comparison = compare(&a, &b);

        tracing::debug!(
            baseline = comparison.baseline,
            candidate = comparison.candidate,
            difference = comparison.difference,
            "Strategy comparison"
        );

        Ok((a, b, comparison))
    }
}
