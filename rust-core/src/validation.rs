/// Validation of raw price cells

use crate::pricing::Cell;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("{field} is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Validate a model identifier cell and return the trimmed identifier.
///
/// Any non-empty identifier is accepted as written.
pub fn validate_model_id(cell: &Cell) -> Result<String, ValidationError> {
    let id = match cell {
        Cell::Empty => return Err(ValidationError::Missing("model")),
        Cell::Text(text) => text.trim().to_string(),
        Cell::Number(n) => n.to_string(),
    };

    if id.is_empty() {
        return Err(ValidationError::Missing("model"));
    }

    Ok(id)
}

/// Validate a per-million price cell.
///
/// Numeric text is accepted, with an optional leading `$`.
pub fn validate_price(cell: &Cell, field: &'static str) -> Result<f64, ValidationError> {
    let value = match cell {
        Cell::Empty => return Err(ValidationError::Missing(field)),
        Cell::Number(n) => *n,
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Missing(field));
            }
            let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
            digits.parse::<f64>().map_err(|_| ValidationError::NotNumeric {
                field,
                value: text.clone(),
            })?
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_model_id() {
        assert_eq!(validate_model_id(&Cell::from("  gpt-4 ")).unwrap(), "gpt-4");
        assert_eq!(validate_model_id(&Cell::Number(42.0)).unwrap(), "42");
        assert_eq!(
            validate_model_id(&Cell::from("   ")),
            Err(ValidationError::Missing("model"))
        );
        assert_eq!(
            validate_model_id(&Cell::Empty),
            Err(ValidationError::Missing("model"))
        );
    }

    #[test]
    fn test_long_model_id_accepted() {
        let long = "m".repeat(1000);
        assert_eq!(validate_model_id(&Cell::from(long.clone())).unwrap(), long);
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(&Cell::Number(30.0), "input price"), Ok(30.0));
        assert_eq!(validate_price(&Cell::from(" 2.5 "), "input price"), Ok(2.5));
        assert_eq!(validate_price(&Cell::from("$15"), "input price"), Ok(15.0));
        assert_eq!(validate_price(&Cell::Number(0.0), "input price"), Ok(0.0));
    }

    #[test]
    fn test_reject_bad_prices() {
        assert!(matches!(
            validate_price(&Cell::Number(-1.0), "output price"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_price(&Cell::Number(f64::NAN), "output price"),
            Err(ValidationError::NotFinite { .. })
        ));
        assert!(matches!(
            validate_price(&Cell::from("free"), "output price"),
            Err(ValidationError::NotNumeric { .. })
        ));
        assert_eq!(
            validate_price(&Cell::Empty, "output price"),
            Err(ValidationError::Missing("output price"))
        );
    }
}
