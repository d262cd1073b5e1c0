use crate::config::ComparatorSettings;
use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

pub const FULL_SHARE: u32 = 100;

/// One specialist and the share of daily traffic routed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub model: String,
    pub percentage: u32,
}

impl Allocation {
    pub fn new(model: impl Into<String>, percentage: u32) -> Self {
        Self {
            model: model.into(),
            percentage,
        }
    }

    /// Queries routed to this specialist, floored.
    pub fn queries(&self, queries_per_day: u64) -> Result<u64> {
        queries_per_day
            .checked_mul(u64::from(self.percentage))
            .map(|routed| routed / u64::from(FULL_SHARE))
            .ok_or_else(|| {
                CostError::InvalidStrategy(format!(
                    "{}% of {} queries overflows for {}",
                    self.percentage, queries_per_day, self.model
                ))
            })
    }
}

/// A classifier that routes every query to one of several specialists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiModelStrategy {
    pub classifier: String,
    pub allocations: Vec<Allocation>,
}

impl MultiModelStrategy {
    pub fn new(classifier: impl Into<String>, allocations: Vec<Allocation>) -> Self {
        Self {
            classifier: classifier.into(),
            allocations,
        }
    }

    pub fn builder(classifier: impl Into<String>) -> AllocationBuilder {
        AllocationBuilder::new(classifier)
    }

    pub fn total_percentage(&self) -> Result<u32> {
        self.allocations
            .iter()
            .try_fold(0u32, |total, a| total.checked_add(a.percentage))
            .ok_or_else(|| {
                CostError::InvalidStrategy("specialist percentages overflow".to_string())
            })
    }

    /// Check the allocation against the comparator's policy.
    ///
    /// At least one specialist is always required. The sum-to-100 check only
    /// applies when `strict_allocation` is set.
    pub fn validate(&self, settings: &ComparatorSettings) -> Result<()> {
        let count = self.allocations.len();
        if count == 0 {
            return Err(CostError::InvalidStrategy(
                "at least one specialist model is required".to_string(),
            ));
        }
        if let Some(min) = settings.min_specialists {
            if count < min {
                return Err(CostError::InvalidStrategy(format!(
                    "{} specialist models configured, at least {} required",
                    count, min
                )));
            }
        }
        if let Some(max) = settings.max_specialists {
            if count > max {
                return Err(CostError::InvalidStrategy(format!(
                    "{} specialist models configured, at most {} allowed",
                    count, max
                )));
            }
        }

        let total = self.total_percentage()?;
        if settings.strict_allocation && total != FULL_SHARE {
            return Err(CostError::InvalidStrategy(format!(
                "specialist percentages sum to {}, expected {}",
                total, FULL_SHARE
            )));
        }
        Ok(())
    }
}

/// Builds an allocation whose last share is whatever remains of 100.
#[derive(Debug, Clone)]
pub struct AllocationBuilder {
    classifier: String,
    allocations: Vec<Allocation>,
    assigned: u32,
}

impl AllocationBuilder {
    pub fn new(classifier: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
            allocations: Vec::new(),
            assigned: 0,
        }
    }

    /// Percentage left for the remaining specialists.
    pub fn remaining(&self) -> u32 {
        FULL_SHARE - self.assigned
    }

    pub fn route(mut self, model: impl Into<String>, percentage: u32) -> Result<Self> {
        let model = model.into();
        if percentage > self.remaining() {
            return Err(CostError::InvalidStrategy(format!(
                "{}% for {} exceeds the remaining {}%",
                percentage,
                model,
                self.remaining()
            )));
        }
        self.assigned += percentage;
        self.allocations.push(Allocation::new(model, percentage));
        Ok(self)
    }

    /// Add the last specialist with the remaining share.
    pub fn finish(mut self, model: impl Into<String>) -> MultiModelStrategy {
        let remaining = self.remaining();
        self.allocations.push(Allocation::new(model, remaining));
        MultiModelStrategy::new(self.classifier, self.allocations)
    }
}
