//! Core engine modules - events, playback, cursor and view synchronization
//!
//! These modules drive the viewer independent of UI.

pub mod cursor;
pub mod event_bus;
pub mod player;
pub mod player_events;
pub mod view_sync;

// Re-exports for convenience
pub use cursor::{CursorPosition, CursorReadout, CursorSync};
pub use event_bus::EventBus;
pub use player::Player;
pub use view_sync::{ViewSync, ViewTransform};
