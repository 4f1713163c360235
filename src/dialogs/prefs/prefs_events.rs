//! Preferences/settings events.

#[derive(Clone, Debug)]
pub struct ToggleSettingsEvent;

#[derive(Clone, Debug)]
pub struct ResetSettingsEvent;

/// Show or hide the crosshair and readout overlay in every dock.
#[derive(Clone, Debug)]
pub struct SetCrosshairVisibleEvent(pub bool);

#[derive(Clone, Debug)]
pub struct SetViewSyncEvent(pub bool);
