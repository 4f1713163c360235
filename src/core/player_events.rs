//! Frame and playback events.

#[derive(Clone, Debug)]
pub struct TogglePlayPauseEvent;

/// Show this frame in every dock (clamped to the stack).
#[derive(Clone, Debug)]
pub struct SetFrameEvent(pub usize);

#[derive(Clone, Debug)]
pub struct StepForwardEvent;

#[derive(Clone, Debug)]
pub struct StepBackwardEvent;

#[derive(Clone, Debug)]
pub struct SetFpsEvent(pub u32);
