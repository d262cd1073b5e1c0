use crate::error::Result;
use crate::pricing::PriceTable;
use crate::tokens::{estimate_tokens, suggest_output_tokens};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

/// Input, output and total cost in dollars. Not rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl CostResult {
    pub fn new(input_cost: f64, output_cost: f64) -> Self {
        Self {
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEstimate {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: CostResult,
}

/// Prices token counts against a shared, read-only price table.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    pricing_table: Arc<PriceTable>,
}

impl CostCalculator {
    pub fn new(pricing_table: Arc<PriceTable>) -> Self {
        Self { pricing_table }
    }

    pub fn pricing_table(&self) -> &PriceTable {
        &self.pricing_table
    }

    /// Token counts are whole tokens; callers round fractional estimates first.
    pub fn calculate_cost(
        &self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Result<CostResult> {
        let pricing = self.pricing_table.get(model)?;
        let input_cost = (input_tokens as f64 / TOKENS_PER_PRICE_UNIT) * pricing.input_price_per_1m;
        let output_cost =
            (output_tokens as f64 / TOKENS_PER_PRICE_UNIT) * pricing.output_price_per_1m;
        Ok(CostResult::new(input_cost, output_cost))
    }

    /// Cost of a single message. Output tokens default to the model-based
    /// suggestion when no explicit count is given.
    pub fn estimate_message(
        &self,
        model: &str,
        text: &str,
        output_tokens: Option<u64>,
    ) -> Result<MessageEstimate> {
        let input_tokens = estimate_tokens(text) as u64;
        let output_tokens = match output_tokens {
            Some(tokens) => tokens,
            None => suggest_output_tokens(model, input_tokens)?,
        };
        let cost = self.calculate_cost(model, input_tokens, output_tokens)?;

        Ok(MessageEstimate {
            model: model.to_string(),
            input_tokens,
            output_tokens,
            cost,
        })
    }
}

impl From<PriceTable> for CostCalculator {
    fn from(table: PriceTable) -> Self {
        Self::new(Arc::new(table))
    }
}
