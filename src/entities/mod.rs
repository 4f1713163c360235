//! Entities module - array stacks, docks and the session that owns them
//!
//! Business logic lives here; widgets only read these types and emit events.

pub mod colormap;
pub mod dock;
pub mod dock_events;
pub mod operation;
pub mod panels;
pub mod session;
pub mod stack;
pub mod threshold;

pub use colormap::Colormap;
pub use dock::{ArrayDock, DockId, DockOrigin};
pub use operation::BinaryOp;
pub use panels::{ImageConfig, PanelConfig, PanelKind};
pub use session::Session;
pub use stack::{Stack, StackShape};
pub use threshold::{ThresholdOp, ThresholdRule};
