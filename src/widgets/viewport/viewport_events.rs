//! Viewport widget events.

use crate::core::view_sync::ViewTransform;
use crate::entities::dock::DockId;

/// Pointer hovered `dock` at unsnapped image coordinates.
#[derive(Clone, Debug)]
pub struct CursorMovedEvent {
    pub dock: DockId,
    pub x: f64,
    pub y: f64,
}

/// User panned or zoomed `dock`; carries its new transform.
#[derive(Clone, Debug)]
pub struct ViewChangedEvent {
    pub dock: DockId,
    pub transform: ViewTransform,
}

/// Re-fit one dock to its panel. Never propagated to other docks.
#[derive(Clone, Debug)]
pub struct ResetViewEvent(pub DockId);
