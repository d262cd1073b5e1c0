pub mod calculator;

pub use calculator::{CostCalculator, CostResult, MessageEstimate};
