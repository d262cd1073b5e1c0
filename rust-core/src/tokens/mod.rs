/// Heuristic token estimation

pub mod estimator;

pub use estimator::{analyze, estimate_tokens, suggest_output_tokens, TokenBreakdown};
