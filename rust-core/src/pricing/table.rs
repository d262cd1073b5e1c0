use super::sheet::{PriceRow, PriceSheet};
use crate::error::{CostError, Result};
use crate::validation::{validate_model_id, validate_price};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub model: String,
    pub input_price_per_1m: f64,
    pub output_price_per_1m: f64,
}

/// Immutable model price catalog, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    entries: Vec<PriceEntry>,
    index: HashMap<String, usize>,
}

impl PriceTable {
    /// Build a table from raw rows.
    ///
    /// Rows are validated in order and the first row for a model identifier
    /// wins; later duplicates are discarded.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = PriceRow>,
    {
        let mut entries: Vec<PriceEntry> = Vec::new();
        let mut index = HashMap::new();
        let mut duplicates = 0usize;

        for (i, row) in rows.into_iter().enumerate() {
            let row_number = i + 1;
            let invalid = |e: crate::validation::ValidationError| {
                CostError::price_data(row_number, e.to_string())
            };

            let model = validate_model_id(&row.model).map_err(invalid)?;
            let input_price_per_1m = validate_price(&row.input_price, "input price").map_err(invalid)?;
            let output_price_per_1m =
                validate_price(&row.output_price, "output price").map_err(invalid)?;

            if index.contains_key(&model) {
                duplicates += 1;
                tracing::debug!(model = %model, row = row_number, "Discarding duplicate price row");
                continue;
            }

            index.insert(model.clone(), entries.len());
            entries.push(PriceEntry {
                model,
                input_price_per_1m,
                output_price_per_1m,
            });
        }

        tracing::info!(
            models = entries.len(),
            duplicates,
            "Found {} unique models",
            entries.len()
        );

        Ok(Self { entries, index })
    }

    pub fn from_sheet(sheet: &PriceSheet) -> Result<Self> {
        Self::build(sheet.price_rows()?)
    }

    pub fn get(&self, model: &str) -> Result<&PriceEntry> {
        self.index
            .get(model)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| {
                tracing::debug!(model, "Price lookup miss");
                CostError::UnknownModel(model.to_string())
            })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.index.contains_key(model)
    }

    /// Model identifiers in table order.
    pub fn models(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.model.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Cell;

    fn sample_rows() -> Vec<PriceRow> {
        vec![
            PriceRow::new("gpt-4", 30.0, 60.0),
            PriceRow::new("claude-3-haiku", 0.25, 1.25),
            PriceRow::new("gpt-4", 10.0, 20.0),
        ]
    }

    #[test]
    fn test_first_occurrence_wins() {
        let table = PriceTable::build(sample_rows()).unwrap();
        assert_eq!(table.len(), 2);
        let gpt4 = table.get("gpt-4").unwrap();
        assert_eq!(gpt4.input_price_per_1m, 30.0);
        assert_eq!(gpt4.output_price_per_1m, 60.0);
        assert_eq!(table.models(), vec!["gpt-4", "claude-3-haiku"]);
    }

    #[test]
    fn test_malformed_duplicate_still_fails() {
        let mut rows = sample_rows();
        rows.push(PriceRow {
            model: Cell::from("gpt-4"),
            input_price: Cell::from("n/a"),
            output_price: Cell::Number(1.0),
        });
        assert!(matches!(
            PriceTable::build(rows),
            Err(CostError::InvalidPriceData { row: 4, .. })
        ));
    }

    #[test]
    fn test_long_model_names_build() {
        let long = format!("provider/{}", "x".repeat(300));
        let table = PriceTable::build(vec![PriceRow::new(&long, 1.0, 2.0)]).unwrap();
        assert!(table.contains(&long));
    }

    #[test]
    fn test_unknown_model() {
        let table = PriceTable::build(sample_rows()).unwrap();
        assert!(!table.contains("foo"));
        match table.get("foo") {
            Err(CostError::UnknownModel(model)) => assert_eq!(model, "foo"),
            other => panic!("expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rows_report_row_number() {
        let rows = vec![
            PriceRow::new("gpt-4", 30.0, 60.0),
            PriceRow {
                model: Cell::from("bad"),
                input_price: Cell::Number(-0.5),
                output_price: Cell::Number(1.0),
            },
        ];
        match PriceTable::build(rows) {
            Err(CostError::InvalidPriceData { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("input price"));
            }
            other => panic!("expected InvalidPriceData, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_model_rejected() {
        let rows = vec![PriceRow {
            model: Cell::Empty,
            input_price: Cell::Number(1.0),
            output_price: Cell::Number(1.0),
        }];
        assert!(matches!(
            PriceTable::build(rows),
            Err(CostError::InvalidPriceData { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = PriceTable::build(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.get("gpt-4").is_err());
    }
}
