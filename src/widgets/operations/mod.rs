//! Operations form: build a derived array from two original docks.

pub mod operation_events;
mod operations;
mod operations_ui;

pub use operations::OperationsForm;
pub use operations_ui::render;
