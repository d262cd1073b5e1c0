use crate::pricing_bindings::PyPriceTable;
use crate::to_py_err;
use llm_cost_core::config::ComparatorSettings;
use llm_cost_core::strategy::{
    Allocation, MultiModelProjection, MultiModelStrategy, SingleModelProjection, StrategyComparison,
};
use llm_cost_core::{CostCalculator, CostResult, DailyCost, StrategyComparator, UsagePattern};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

fn cost_dict<'py>(py: Python<'py>, cost: &CostResult) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("input_cost", cost.input_cost)?;
    dict.set_item("output_cost", cost.output_cost)?;
    dict.set_item("total_cost", cost.total_cost)?;
    Ok(dict)
}

fn summary<'py>(py: Python<'py>, projection: &impl DailyCost, days: u32) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("daily_cost", projection.daily_total())?;
    dict.set_item("annual_cost", projection.annual_cost(days))?;
    dict.set_item("cost_per_query", projection.cost_per_query().map_err(to_py_err)?)?;
    Ok(dict)
}

#[pyclass(name = "CostCalculator")]
pub struct PyCostCalculator {
    comparator: StrategyComparator,
}

#[pymethods]
impl PyCostCalculator {
    #[new]
    #[pyo3(signature = (table, classifier_input_tokens = 100, classifier_output_tokens = 50, strict = true))]
    fn new(
        table: PyRef<'_, PyPriceTable>,
        classifier_input_tokens: u64,
        classifier_output_tokens: u64,
        strict: bool,
    ) -> Self {
        let settings = ComparatorSettings {
            classifier_input_tokens,
            classifier_output_tokens,
            strict_allocation: strict,
            ..ComparatorSettings::default()
        };
        Self {
            comparator: StrategyComparator::new(CostCalculator::new(table.inner.clone()), settings),
        }
    }

    fn calculate_cost<'py>(
        &self,
        py: Python<'py>,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> PyResult<&'py PyDict> {
        let cost = self
            .comparator
            .calculator()
            .calculate_cost(model, input_tokens, output_tokens)
            .map_err(to_py_err)?;
        cost_dict(py, &cost)
    }

    #[pyo3(signature = (model, text, output_tokens = None))]
    fn estimate_message<'py>(
        &self,
        py: Python<'py>,
        model: &str,
        text: &str,
        output_tokens: Option<u64>,
    ) -> PyResult<&'py PyDict> {
        let estimate = self
            .comparator
            .calculator()
            .estimate_message(model, text, output_tokens)
            .map_err(to_py_err)?;
        let dict = cost_dict(py, &estimate.cost)?;
        dict.set_item("input_tokens", estimate.input_tokens)?;
        dict.set_item("output_tokens", estimate.output_tokens)?;
        Ok(dict)
    }

    fn project_single<'py>(
        &self,
        py: Python<'py>,
        model: &str,
        queries_per_day: u64,
        avg_input_tokens: u64,
        avg_output_ratio: f64,
    ) -> PyResult<&'py PyDict> {
        let usage = UsagePattern::new(queries_per_day, avg_input_tokens, avg_output_ratio)
            .map_err(to_py_err)?;
        let projection: SingleModelProjection = self
            .comparator
            .project_single(model, &usage)
            .map_err(to_py_err)?;

        let dict = summary(py, &projection, self.comparator.settings().days_per_year)?;
        dict.set_item("model", &projection.model)?;
        dict.set_item("cost", cost_dict(py, &projection.cost)?)?;
        Ok(dict)
    }

    /// `allocations` is a list of `(model, percentage)` pairs.
    fn project_multi<'py>(
        &self,
        py: Python<'py>,
        classifier: &str,
        allocations: Vec<(String, u32)>,
        queries_per_day: u64,
        avg_input_tokens: u64,
        avg_output_ratio: f64,
    ) -> PyResult<&'py PyDict> {
        let usage = UsagePattern::new(queries_per_day, avg_input_tokens, avg_output_ratio)
            .map_err(to_py_err)?;
        let strategy = MultiModelStrategy::new(
            classifier,
            allocations
                .into_iter()
                .map(|(model, pct)| Allocation::new(model, pct))
                .collect(),
        );
        let projection: MultiModelProjection = self
            .comparator
            .project_multi(&strategy, &usage)
            .map_err(to_py_err)?;

        let dict = summary(py, &projection, self.comparator.settings().days_per_year)?;

        let classifier_dict = cost_dict(py, &projection.classifier.cost)?;
        classifier_dict.set_item("model", &projection.classifier.model)?;
        dict.set_item("classifier", classifier_dict)?;

        let specialists = PyList::empty(py);
        for specialist in &projection.specialists {
            let item = cost_dict(py, &specialist.cost)?;
            item.set_item("model", &specialist.model)?;
            item.set_item("percentage", specialist.percentage)?;
            item.set_item("queries", specialist.queries)?;
            item.set_item("cost_per_query", specialist.cost_per_query().ok())?;
            specialists.append(item)?;
        }
        dict.set_item("specialists", specialists)?;
        Ok(dict)
    }
}

#[pyfunction]
pub fn estimate_tokens(text: &str) -> usize {
    llm_cost_core::tokens::estimate_tokens(text)
}

#[pyfunction]
pub fn suggest_output_tokens(model: &str, input_tokens: u64) -> PyResult<u64> {
    llm_cost_core::tokens::suggest_output_tokens(model, input_tokens).map_err(to_py_err)
}

/// Compare two daily totals. `difference_pct` is `None` for a zero baseline.
#[pyfunction]
pub fn compare<'py>(py: Python<'py>, baseline: f64, candidate: f64) -> PyResult<&'py PyDict> {
    let cmp = StrategyComparison::between(baseline, candidate);
    let dict = PyDict::new(py);
    dict.set_item("difference", cmp.difference)?;
    dict.set_item("difference_pct", cmp.difference_pct().ok())?;
    dict.set_item("candidate_is_cheaper", cmp.candidate_is_cheaper())?;
    Ok(dict)
}
