use thiserror::Error;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use toml::de::Error as TomlError;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("Invalid price data (row {row}): {reason}")]
    InvalidPriceData { row: usize, reason: String },

    #[error("Model {0} not found in pricing data")]
    UnknownModel(String),

    #[error("Invalid usage pattern: {0}")]
    InvalidUsagePattern(String),

    #[error("Invalid strategy: {0}")]
    InvalidStrategy(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] JsonError),

    #[error("Config parse error: {0}")]
    Toml(#[from] TomlError),
}

impl CostError {
    pub(crate) fn price_data(row: usize, reason: impl Into<String>) -> Self {
        CostError::InvalidPriceData {
            row,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CostError>;
