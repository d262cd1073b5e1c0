/// Generic tabular price records
///
/// The dashboard reads a spreadsheet whose second column names the model and
/// whose price columns are literally `Input $/M` and `Output $/M`. This module
/// holds that shape without depending on any spreadsheet library.

use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INPUT_PRICE_COLUMN: &str = "Input $/M";
pub const OUTPUT_PRICE_COLUMN: &str = "Output $/M";
/// The model identifier is positionally the second column.
pub const MODEL_COLUMN_INDEX: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl Cell {
    fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Empty,
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// One priced model as read from a sheet, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub model: Cell,
    pub input_price: Cell,
    pub output_price: Cell,
}

impl PriceRow {
    pub fn new(model: &str, input_price: f64, output_price: f64) -> Self {
        Self {
            model: Cell::from(model),
            input_price: Cell::Number(input_price),
            output_price: Cell::Number(output_price),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SheetDocument {
    Table { columns: Vec<String>, rows: Vec<Vec<Value>> },
    Records(Vec<Map<String, Value>>),
}

impl PriceSheet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Parse either `{"columns": [...], "rows": [[...]]}` or an array of
    /// objects. For objects, keys become columns in first-seen order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SheetDocument = serde_json::from_str(json)?;
        let sheet = match document {
            SheetDocument::Table { columns, rows } => Self {
                columns,
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(Cell::from_json).collect())
                    .collect(),
            },
            SheetDocument::Records(records) => {
                let mut columns: Vec<String> = Vec::new();
                for record in &records {
                    for key in record.keys() {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                    }
                }
                let rows = records
                    .iter()
                    .map(|record| {
                        columns
                            .iter()
                            .map(|col| record.get(col).map(Cell::from_json).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                Self { columns, rows }
            }
        };
        Ok(sheet)
    }

    pub fn model_column(&self) -> Option<&str> {
        self.columns.get(MODEL_COLUMN_INDEX).map(String::as_str)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CostError::price_data(0, format!("missing column '{}'", name)))
    }

    /// Project every sheet row onto the model and price columns.
    pub fn price_rows(&self) -> Result<Vec<PriceRow>> {
        if self.model_column().is_none() {
            return Err(CostError::price_data(
                0,
                "sheet needs at least two columns to locate the model column",
            ));
        }
        let input_idx = self.column_index(INPUT_PRICE_COLUMN)?;
        let output_idx = self.column_index(OUTPUT_PRICE_COLUMN)?;

        let cell = |row: &[Cell], idx: usize| row.get(idx).cloned().unwrap_or_default();

        Ok(self
            .rows
            .iter()
            .map(|row| PriceRow {
                model: cell(row, MODEL_COLUMN_INDEX),
                input_price: cell(row, input_idx),
                output_price: cell(row, output_idx),
            })
            .collect())
    }
}
