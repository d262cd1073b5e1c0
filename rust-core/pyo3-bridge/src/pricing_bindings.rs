use crate::to_py_err;
use llm_cost_core::pricing::{PriceRow, PriceSheet, PriceTable};
use pyo3::prelude::*;
use std::sync::Arc;

#[pyclass(name = "PriceTable")]
pub struct PyPriceTable {
    pub(crate) inner: Arc<PriceTable>,
}

#[pymethods]
impl PyPriceTable {
    /// Build from `(model, input $/M, output $/M)` tuples.
    #[new]
    fn new(rows: Vec<(String, f64, f64)>) -> PyResult<Self> {
        let rows = rows
            .iter()
            .map(|(model, input, output)| PriceRow::new(model, *input, *output));
        let table = PriceTable::build(rows).map_err(to_py_err)?;
        Ok(Self {
            inner: Arc::new(table),
        })
    }

    /// Build from a JSON sheet, e.g. `DataFrame.to_json(orient="records")`.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let sheet = PriceSheet::from_json_str(json).map_err(to_py_err)?;
        let table = PriceTable::from_sheet(&sheet).map_err(to_py_err)?;
        Ok(Self {
            inner: Arc::new(table),
        })
    }

    fn models(&self) -> Vec<String> {
        self.inner.models().into_iter().map(str::to_string).collect()
    }

    fn prices(&self, model: &str) -> PyResult<(f64, f64)> {
        let entry = self.inner.get(model).map_err(to_py_err)?;
        Ok((entry.input_price_per_1m, entry.output_price_per_1m))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, model: &str) -> bool {
        self.inner.contains(model)
    }
}
