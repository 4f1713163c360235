//! Events emitted from a dock's panels and title bar.

use crate::entities::colormap::Colormap;
use crate::entities::dock::DockId;
use crate::entities::panels::PanelKind;
use crate::entities::threshold::ThresholdOp;

// === Lifecycle ===

#[derive(Clone, Debug)]
pub struct DuplicateDockEvent(pub DockId);

#[derive(Clone, Debug)]
pub struct CloseDockEvent(pub DockId);

// === Image configuration ===

#[derive(Clone, Debug)]
pub struct SetColormapEvent {
    pub dock: DockId,
    pub cmap: Colormap,
}

#[derive(Clone, Debug)]
pub struct SetVminEvent {
    pub dock: DockId,
    pub value: f32,
}

#[derive(Clone, Debug)]
pub struct SetVmaxEvent {
    pub dock: DockId,
    pub value: f32,
}

/// Stretch vmin/vmax over the stack's full min/max.
#[derive(Clone, Debug)]
pub struct ResetColourRangeEvent(pub DockId);

// === Threshold ===

#[derive(Clone, Debug)]
pub struct ArmThresholdEvent {
    pub dock: DockId,
    pub op: ThresholdOp,
}

#[derive(Clone, Debug)]
pub struct SetThresholdCutoffEvent {
    pub dock: DockId,
    pub cutoff: f32,
}

#[derive(Clone, Debug)]
pub struct CancelThresholdEvent(pub DockId);

// === Panel clipboard ===

#[derive(Clone, Debug)]
pub struct CopyPanelEvent {
    pub dock: DockId,
    pub kind: PanelKind,
}

#[derive(Clone, Debug)]
pub struct PastePanelEvent {
    pub dock: DockId,
    pub kind: PanelKind,
}
