use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};

/// Daily traffic shape supplied by the caller for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsagePattern {
    pub queries_per_day: u64,
    pub avg_input_tokens: u64,
    /// Output tokens per input token, typically 0.5 to 3.0
    pub avg_output_ratio: f64,
}

impl UsagePattern {
    pub fn new(queries_per_day: u64, avg_input_tokens: u64, avg_output_ratio: f64) -> Result<Self> {
        let usage = Self {
            queries_per_day,
            avg_input_tokens,
            avg_output_ratio,
        };
        usage.validate()?;
        Ok(usage)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queries_per_day == 0 {
            return Err(CostError::InvalidUsagePattern(
                "queries_per_day must be positive".to_string(),
            ));
        }
        if self.avg_input_tokens == 0 {
            return Err(CostError::InvalidUsagePattern(
                "avg_input_tokens must be positive".to_string(),
            ));
        }
        if !self.avg_output_ratio.is_finite() || self.avg_output_ratio <= 0.0 {
            return Err(CostError::InvalidUsagePattern(format!(
                "avg_output_ratio must be a positive number, got {}",
                self.avg_output_ratio
            )));
        }
        Ok(())
    }

    /// Input tokens across every query of the day.
    pub fn daily_input_tokens(&self) -> Result<u64> {
        self.per_day(self.avg_input_tokens, "daily input tokens")
    }

    /// Output tokens for one query, rounded half-to-even.
    pub fn output_tokens_per_query(&self) -> Result<u64> {
        let tokens = (self.avg_input_tokens as f64 * self.avg_output_ratio).round_ties_even();
        // u64::MAX as f64 rounds up to 2^64
        if tokens >= u64::MAX as f64 {
            return Err(CostError::InvalidUsagePattern(format!(
                "output tokens per query overflow: {} * {}",
                self.avg_input_tokens, self.avg_output_ratio
            )));
        }
        Ok(tokens as u64)
    }

    pub fn daily_output_tokens(&self) -> Result<u64> {
        self.per_day(self.output_tokens_per_query()?, "daily output tokens")
    }

    /// Scale a per-query token count to the whole day.
    pub fn per_day(&self, tokens_per_query: u64, what: &str) -> Result<u64> {
        tokens_per_query
            .checked_mul(self.queries_per_day)
            .ok_or_else(|| {
                CostError::InvalidUsagePattern(format!(
                    "{} overflow: {} tokens * {} queries",
                    what, tokens_per_query, self.queries_per_day
                ))
            })
    }
}

impl Default for UsagePattern {
    fn default() -> Self {
        Self {
            queries_per_day: 100,
            avg_input_tokens: 500,
            avg_output_ratio: 1.5,
        }
    }
}
