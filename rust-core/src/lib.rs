pub mod config;
pub mod cost;
pub mod error;
pub mod observability;
pub mod pricing;
pub mod strategy;
pub mod tokens;
pub mod validation;

pub use config::{ComparatorSettings, CostConfig};
pub use cost::{CostCalculator, CostResult};
pub use error::{CostError, Result};
pub use pricing::{PriceEntry, PriceTable};
pub use strategy::{DailyCost, Strategy, StrategyComparator, UsagePattern};
pub use tokens::estimate_tokens;
