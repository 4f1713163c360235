//! Python bindings for stackview - synchronized 3-D array stack viewer.
//!
//! Usage:
//! ```python
//! import numpy as np
//! import stackview
//!
//! a = np.random.rand(100, 64, 128).astype(np.float32)
//! b = np.random.rand(100, 64, 128).astype(np.float32)
//!
//! # Separate process (returns the child pid immediately)
//! pid = stackview.launch_viewer([a, b], ["A", "B"])
//!
//! # Blocking window in this process
//! stackview.launch_viewer([a, b], ["A", "B"], separate_process=False)
//! ```

use numpy::PyReadonlyArrayDyn;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use ::stackview::{LaunchMode, Launched, ViewerError};

fn to_py_err(err: ViewerError) -> PyErr {
    match err {
        ViewerError::ShapeMismatch { .. }
        | ViewerError::NotThreeDimensional { .. }
        | ViewerError::EmptyInput
        | ViewerError::TitleCountMismatch { .. } => PyValueError::new_err(err.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Show float32 arrays of shape (time, y, x) in the viewer.
///
/// Args:
///     arrays: List of numpy float32 arrays, all with the same 3-D shape
///     titles: One title per array
///     separate_process: Run the viewer in its own process (default: True)
///
/// Returns:
///     The child process id when `separate_process` is true, else None
///     after the window was closed.
///
/// Raises:
///     ValueError: If the arrays are not 3-D, differ in shape, or titles don't match
///     RuntimeError: If the viewer fails to start
#[pyfunction]
#[pyo3(signature = (arrays, titles, separate_process = true))]
fn launch_viewer(
    py: Python<'_>,
    arrays: Vec<PyReadonlyArrayDyn<'_, f32>>,
    titles: Vec<String>,
    separate_process: bool,
) -> PyResult<Option<u32>> {
    // Init logging (only once)
    let _ = env_logger::try_init();

    let owned: Vec<_> = arrays.iter().map(|a| a.as_array().to_owned()).collect();
    let mode = if separate_process {
        LaunchMode::Subprocess
    } else {
        LaunchMode::InProcess
    };
    log::info!("stackview-py: launch_viewer({} array(s), {:?})", owned.len(), mode);

    let launched = py
        .allow_threads(|| ::stackview::launch_viewer(owned, titles, mode))
        .map_err(to_py_err)?;

    Ok(match launched {
        Launched::Spawned(child) => Some(child.id()),
        Launched::Finished => None,
    })
}

/// Get stackview version string.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Python module definition.
#[pymodule]
fn stackview(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(launch_viewer, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
