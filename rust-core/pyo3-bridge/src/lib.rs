use pyo3::exceptions::{PyKeyError, PyOSError, PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;

mod cost_bindings;
mod pricing_bindings;

use cost_bindings::PyCostCalculator;
use llm_cost_core::config::LoggingConfig;
use llm_cost_core::CostError;
use pricing_bindings::PyPriceTable;

pub(crate) fn to_py_err(err: CostError) -> PyErr {
    match err {
        CostError::UnknownModel(model) => {
            PyKeyError::new_err(format!("Model {} not found in pricing data", model))
        }
        CostError::DivisionByZero(what) => PyZeroDivisionError::new_err(what),
        CostError::Io(e) => PyOSError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

#[pymodule]
fn llm_cost_bridge(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyPriceTable>()?;
    m.add_class::<PyCostCalculator>()?;
    m.add_function(wrap_pyfunction!(cost_bindings::estimate_tokens, m)?)?;
    m.add_function(wrap_pyfunction!(cost_bindings::suggest_output_tokens, m)?)?;
    m.add_function(wrap_pyfunction!(cost_bindings::compare, m)?)?;

    llm_cost_core::observability::setup_logging(&LoggingConfig::default());

    Ok(())
}
