//! stackview - synchronized viewer for stacks of 3-D (time, y, x) arrays
//!
//! Library surface used by the binary, the integration tests and the
//! Python bindings. Start with [`runner::launch_viewer`] to show arrays, or
//! drive a [`Session`] directly for headless use.

// Core engine (events, player, cursor, view sync)
pub mod core;

// App modules
pub mod app;
pub mod cli;
pub mod config;
pub mod dialogs;
pub mod entities;
pub mod error;
pub mod main_events;
pub mod payload;
pub mod runner;
pub mod widgets;

// Re-export commonly used types from core
pub use core::event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use core::player::Player;

// Re-export entities
pub use entities::{ArrayDock, BinaryOp, Colormap, DockId, Session, Stack, ThresholdOp};
pub use error::{Result, ViewerError};
pub use runner::{LaunchMode, Launched, ViewerOptions, launch_viewer, run_viewer};
