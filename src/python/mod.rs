//! Python bindings, built with the `python` feature
//!
//! ```python
//! from consumption._lib import ReferenceStore, Scenario
//!
//! store = ReferenceStore(reference_dict)
//! scenario = Scenario(store, {"year": 2023, "country": "Ireland", "population": 195000})
//! scenario.add_policy("retrofit", {
//!     "policy_year": 2025,
//!     "levers": [{"type": "EfficiencyRetrofit", "scaler": 10.0}],
//! })
//! scenario.difference("retrofit", 2030)
//! ```

use consumption_core::errors::ConsumptionError;
use consumption_core::reference::ReferenceData;
use consumption_core::runs::ScenarioRuns;
use consumption_core::table::EmissionsTable;
use consumption_core::{PolicyRun, ProjectionResult, ScenarioConfig, ScenarioState};
use numpy::{PyArray2, ToPyArray};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;

fn to_py_err(err: ConsumptionError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn depythonize<T: serde::de::DeserializeOwned>(value: Bound<'_, PyAny>) -> PyResult<T> {
    pythonize::depythonize_bound(value).map_err(|e| PyValueError::new_err(format!("{}", e)))
}

/// Immutable reference tables shared by every scenario
#[pyclass]
#[pyo3(name = "ReferenceStore")]
#[derive(Debug, Clone)]
pub struct PyReferenceStore(pub Arc<ReferenceData>);

#[pymethods]
impl PyReferenceStore {
    /// Build the store from a dict with `products`, `sector_map` and `countries`
    #[new]
    fn new(data: Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(Self(Arc::new(depythonize(data)?)))
    }

    /// Countries that have reference tables
    fn countries(&self) -> Vec<String> {
        self.0.countries().map(|c| c.to_string()).collect()
    }

    fn products(&self) -> Vec<String> {
        self.0.products().labels().to_vec()
    }
}

fn table_to_dict<'py>(py: Python<'py>, table: &EmissionsTable) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("years", table.years().collect::<Vec<i32>>())?;
    dict.set_item("columns", EmissionsTable::column_labels())?;
    let values: Bound<'py, PyArray2<f64>> = table.values().to_pyarray_bound(py);
    dict.set_item("values", values)?;
    Ok(dict)
}

fn result_to_dict<'py>(
    py: Python<'py>,
    result: &ProjectionResult,
    products: &[String],
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("per_capita", table_to_dict(py, &result.per_capita)?)?;
    dict.set_item("area", table_to_dict(py, &result.area)?)?;

    let product_table = PyDict::new_bound(py);
    product_table.set_item("columns", products.to_vec())?;
    product_table.set_item("values", result.products.values().to_pyarray_bound(py))?;
    dict.set_item("products", product_table)?;
    Ok(dict)
}

/// A baseline projection for one region plus labelled policy runs
#[pyclass]
#[pyo3(name = "Scenario")]
pub struct PyScenario(ScenarioRuns);

#[pymethods]
impl PyScenario {
    /// Build the baseline from construction parameters and project it
    #[new]
    fn new(reference: &PyReferenceStore, config: Bound<'_, PyAny>) -> PyResult<Self> {
        let config: ScenarioConfig = depythonize(config)?;
        let state = ScenarioState::new(reference.0.clone(), &config).map_err(to_py_err)?;
        Ok(Self(ScenarioRuns::new(state).map_err(to_py_err)?))
    }

    #[getter]
    fn region(&self) -> String {
        self.0.baseline_state().region().to_string()
    }

    #[getter]
    fn base_year(&self) -> i32 {
        self.0.baseline_state().base_year()
    }

    fn labels(&self) -> Vec<String> {
        self.0.labels().map(|l| l.to_string()).collect()
    }

    /// Project a policy run, given as a dict, and store it under `label`
    fn add_policy(&mut self, label: &str, run: Bound<'_, PyAny>) -> PyResult<()> {
        let run: PolicyRun = depythonize(run)?;
        self.0.add_policy(label, &run).map_err(to_py_err)?;
        Ok(())
    }

    fn baseline<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        result_to_dict(
            py,
            self.0.baseline(),
            self.0.baseline_state().products().labels(),
        )
    }

    fn result<'py>(&self, py: Python<'py>, label: &str) -> PyResult<Bound<'py, PyDict>> {
        let result = self
            .0
            .get(label)
            .map_err(|_| PyKeyError::new_err(label.to_string()))?;
        result_to_dict(py, result, self.0.baseline_state().products().labels())
    }

    /// Area emissions of a policy run minus the baseline in `year`
    fn difference(&self, label: &str, year: i32) -> PyResult<f64> {
        self.0.difference(label, year).map_err(to_py_err)
    }

    /// Running sums of the area grand total, as (year, value) pairs
    #[pyo3(signature = (label=None))]
    fn cumulative(&self, label: Option<&str>) -> PyResult<Vec<(i32, f64)>> {
        let result = match label {
            Some(label) => self
                .0
                .get(label)
                .map_err(|_| PyKeyError::new_err(label.to_string()))?,
            None => self.0.baseline(),
        };
        Ok(result.area.cumulative_totals())
    }

    fn __repr__(&self) -> String {
        format!(
            "<Scenario region={} base_year={} policies={}>",
            self.region(),
            self.base_year(),
            self.0.policies().len()
        )
    }
}

#[pymodule]
#[pyo3(name = "_lib")]
fn consumption(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<PyReferenceStore>()?;
    m.add_class::<PyScenario>()?;
    Ok(())
}
