//! Viewport widget: one dock's image with pan/zoom and crosshair.

mod viewport;
mod viewport_ui;
pub mod viewport_events;

pub use viewport::{ViewportMode, ViewportState};
pub use viewport_ui::{ViewportTexture, render};
