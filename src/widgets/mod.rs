//! UI Widgets - modular, reusable UI components
//!
//! Each widget reads state and reports user actions through the event bus.

pub mod dock_panel;
pub mod operations;
pub mod status;
pub mod transport;
pub mod viewport;
