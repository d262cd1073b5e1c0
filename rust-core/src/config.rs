/// TOML configuration for the cost engine and its callers

use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorSettings {
    /// Classifier input tokens charged per query
    pub classifier_input_tokens: u64,
    /// Classifier output tokens charged per query
    pub classifier_output_tokens: u64,
    pub days_per_year: u32,
    /// Reject specialist percentages that do not add up to 100
    pub strict_allocation: bool,
    pub min_specialists: Option<usize>,
    pub max_specialists: Option<usize>,
}

impl Default for ComparatorSettings {
    fn default() -> Self {
        Self {
            classifier_input_tokens: 100,
            classifier_output_tokens: 50,
            days_per_year: 365,
            strict_allocation: true,
            min_specialists: None,
            max_specialists: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub logging: LoggingConfig,
    pub comparator: ComparatorSettings,
    pub prices: PricesConfig,
}

impl CostConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CostConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.comparator;
        if c.days_per_year == 0 {
            return Err(CostError::InvalidConfig(
                "comparator.days_per_year must be positive".to_string(),
            ));
        }
        if c.min_specialists == Some(0) {
            return Err(CostError::InvalidConfig(
                "comparator.min_specialists must be at least 1".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (c.min_specialists, c.max_specialists) {
            if min > max {
                return Err(CostError::InvalidConfig(format!(
                    "comparator.min_specialists ({}) exceeds max_specialists ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CostConfig::from_toml_str("").unwrap();
        assert_eq!(config.comparator.classifier_input_tokens, 100);
        assert_eq!(config.comparator.classifier_output_tokens, 50);
        assert_eq!(config.comparator.days_per_year, 365);
        assert!(config.comparator.strict_allocation);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.prices.path.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = CostConfig::from_toml_str(
            r#"
            [logging]
            format = "json"

            [comparator]
            classifier_input_tokens = 200
            max_specialists = 5
            min_specialists = 2

            [prices]
            path = "data/prices.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.comparator.classifier_input_tokens, 200);
        assert_eq!(config.comparator.classifier_output_tokens, 50);
        assert_eq!(config.comparator.max_specialists, Some(5));
        assert_eq!(config.prices.path, Some(PathBuf::from("data/prices.json")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CostConfig::from_toml_str("[comparator]\ndays_per_year = 0"),
            Err(CostError::InvalidConfig(_))
        ));
        assert!(matches!(
            CostConfig::from_toml_str("[comparator]\nmin_specialists = 4\nmax_specialists = 2"),
            Err(CostError::InvalidConfig(_))
        ));
        assert!(matches!(
            CostConfig::from_toml_str("[comparator]\ndays_per_year = \"many\""),
            Err(CostError::Toml(_))
        ));
    }
}
