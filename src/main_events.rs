//! Application event handling.
//!
//! Widgets only emit events. Once per UI frame the app polls the bus and
//! hands each event to [`handle_app_event`], which is the single place where
//! the player and session are mutated. Anything the app must do afterwards
//! (open or close tabs, show a warning) comes back in an [`EventResult`].
//!
//! Downcasting goes through `downcast_event`, which derefs to `dyn Event`
//! before calling `as_any()`; see `event_bus.rs`.

use log::{debug, trace, warn};

use crate::core::event_bus::{BoxedEvent, downcast_event};
use crate::core::player::Player;
use crate::core::player_events::*;
use crate::dialogs::prefs::AppSettings;
use crate::dialogs::prefs::prefs_events::*;
use crate::dialogs::warning::Warning;
use crate::entities::dock::DockId;
use crate::entities::dock_events::*;
use crate::entities::session::Session;
use crate::error::ViewerError;
use crate::widgets::operations::operation_events::*;
use crate::widgets::viewport::viewport_events::*;

/// Result of handling an app event - may contain deferred actions
#[derive(Debug, Default, PartialEq)]
pub struct EventResult {
    /// Docks to add as tabs.
    pub opened_docks: Vec<DockId>,
    /// Docks whose tabs must go.
    pub closed_docks: Vec<DockId>,
    /// Show (true) or hide (false) the operations form.
    pub show_operations: Option<bool>,
    pub warning: Option<Warning>,
    pub status: Option<String>,
    pub reset_settings: bool,
}

impl EventResult {
    fn rejected(&mut self, action: &str, err: ViewerError) {
        warn!("{} rejected: {}", action, err);
        match err {
            ViewerError::NonFiniteResult { .. } => {
                self.warning = Some(Warning::new("Calculation error", err.to_string()));
            }
            ViewerError::ShapeMismatch { .. } | ViewerError::NotThreeDimensional { .. } => {
                self.warning = Some(Warning::new("Invalid array", err.to_string()));
            }
            other => self.status = Some(other.to_string()),
        }
    }

    fn check(&mut self, action: &str, outcome: crate::error::Result<()>) {
        if let Err(err) = outcome {
            self.rejected(action, err);
        }
    }
}

fn show_frame(player: &mut Player, session: &mut Session, frame: usize) {
    let frame = player.set_frame(frame);
    session.set_frame(frame);
    trace!("Frame -> {}", frame);
}

/// Handle a single app event (called from main event loop).
/// Returns Some(result) if event was handled, None otherwise.
pub fn handle_app_event(
    event: &BoxedEvent,
    player: &mut Player,
    session: &mut Session,
    settings: &mut AppSettings,
    show_settings: &mut bool,
) -> Option<EventResult> {
    let mut result = EventResult::default();

    // === Playback ===
    if downcast_event::<TogglePlayPauseEvent>(event).is_some() {
        player.toggle_play();
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetFrameEvent>(event) {
        show_frame(player, session, e.0);
        return Some(result);
    }
    if downcast_event::<StepForwardEvent>(event).is_some() {
        let next = player.frame().saturating_add(1);
        show_frame(player, session, next);
        return Some(result);
    }
    if downcast_event::<StepBackwardEvent>(event).is_some() {
        let prev = player.frame().saturating_sub(1);
        show_frame(player, session, prev);
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetFpsEvent>(event) {
        player.set_fps(e.0);
        settings.fps = player.fps();
        return Some(result);
    }

    // === Viewport ===
    if let Some(e) = downcast_event::<CursorMovedEvent>(event) {
        if let Err(err) = session.pointer_moved(e.dock, e.x, e.y) {
            trace!("Cursor event for stale dock ignored: {}", err);
        }
        return Some(result);
    }
    if let Some(e) = downcast_event::<ViewChangedEvent>(event) {
        match session.change_view(e.dock, e.transform) {
            Ok(updated) => trace!("View change on {} copied to {} dock(s)", e.dock, updated),
            Err(err) => result.rejected("View change", err),
        }
        return Some(result);
    }
    if let Some(e) = downcast_event::<ResetViewEvent>(event) {
        let outcome = session.reset_view(e.0);
        result.check("Reset view", outcome);
        return Some(result);
    }

    // === Dock lifecycle ===
    if let Some(e) = downcast_event::<DuplicateDockEvent>(event) {
        match session.duplicate_dock(e.0) {
            Ok(id) => result.opened_docks.push(id),
            Err(err) => result.rejected("Duplicate", err),
        }
        return Some(result);
    }
    if let Some(e) = downcast_event::<CloseDockEvent>(event) {
        match session.close_dock(e.0) {
            Ok(dock) => result.closed_docks.push(dock.id()),
            Err(err) => result.rejected("Close", err),
        }
        return Some(result);
    }

    // === Image configuration ===
    if let Some(e) = downcast_event::<SetColormapEvent>(event) {
        let outcome = session.dock_mut(e.dock).and_then(|d| d.set_colormap(e.cmap));
        result.check("Set colormap", outcome);
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetVminEvent>(event) {
        let outcome = session.dock_mut(e.dock).and_then(|d| d.set_vmin(e.value));
        result.check("Set vmin", outcome);
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetVmaxEvent>(event) {
        let outcome = session.dock_mut(e.dock).and_then(|d| d.set_vmax(e.value));
        result.check("Set vmax", outcome);
        return Some(result);
    }
    if let Some(e) = downcast_event::<ResetColourRangeEvent>(event) {
        let outcome = session.dock_mut(e.0).and_then(|d| d.reset_colour_range());
        result.check("Reset colour range", outcome);
        return Some(result);
    }

    // === Threshold ===
    if let Some(e) = downcast_event::<ArmThresholdEvent>(event) {
        match session.dock_mut(e.dock) {
            Ok(dock) => {
                let rule = dock.arm_threshold(e.op);
                debug!("Threshold on '{}': {} {}", dock.display_title(), rule.op.symbol(), rule.cutoff);
            }
            Err(err) => result.rejected("Threshold", err),
        }
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetThresholdCutoffEvent>(event) {
        let outcome = session.dock_mut(e.dock).map(|d| d.set_threshold_cutoff(e.cutoff));
        result.check("Threshold cutoff", outcome);
        return Some(result);
    }
    if let Some(e) = downcast_event::<CancelThresholdEvent>(event) {
        let outcome = session.dock_mut(e.0).map(|d| d.cancel_threshold());
        result.check("Cancel threshold", outcome);
        return Some(result);
    }

    // === Panel clipboard ===
    if let Some(e) = downcast_event::<CopyPanelEvent>(event) {
        let outcome = session.copy_panel(e.dock, e.kind);
        result.check("Copy panel", outcome);
        if result.status.is_none() {
            result.status = Some(format!("{} settings copied", e.kind.name()));
        }
        return Some(result);
    }
    if let Some(e) = downcast_event::<PastePanelEvent>(event) {
        let outcome = session.paste_panel(e.dock, e.kind);
        result.check("Paste panel", outcome);
        return Some(result);
    }

    // === Operations ===
    if downcast_event::<OpenOperationsEvent>(event).is_some() {
        result.show_operations = Some(true);
        return Some(result);
    }
    if downcast_event::<CancelOperationsEvent>(event).is_some() {
        result.show_operations = Some(false);
        return Some(result);
    }
    if let Some(e) = downcast_event::<CreateDerivedEvent>(event) {
        match session.create_derived(e.op, &e.a, &e.b) {
            Ok(id) => {
                result.opened_docks.push(id);
                result.show_operations = Some(false);
            }
            Err(err) => result.rejected("Derived array", err),
        }
        return Some(result);
    }

    // === Preferences ===
    if downcast_event::<ToggleSettingsEvent>(event).is_some() {
        *show_settings = !*show_settings;
        return Some(result);
    }
    if downcast_event::<ResetSettingsEvent>(event).is_some() {
        result.reset_settings = true;
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetCrosshairVisibleEvent>(event) {
        session.set_crosshair_visible(e.0);
        settings.show_crosshair = e.0;
        return Some(result);
    }
    if let Some(e) = downcast_event::<SetViewSyncEvent>(event) {
        session.set_view_sync(e.0);
        settings.sync_views = e.0;
        return Some(result);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;
    use crate::entities::colormap::Colormap;
    use crate::entities::operation::BinaryOp;
    use crate::entities::panels::{ImageConfig, PanelKind};
    use crate::entities::threshold::ThresholdOp;
    use ndarray::Array3;

    struct Harness {
        bus: EventBus,
        player: Player,
        session: Session,
        settings: AppSettings,
        show_settings: bool,
    }

    impl Harness {
        fn new() -> Self {
            let a = Array3::from_shape_fn((5, 4, 4), |(t, y, x)| (t * 100 + y * 10 + x) as f32);
            let b = Array3::from_elem((5, 4, 4), 2.0f32);
            let session = Session::with_arrays(vec![a.into_dyn(), b.into_dyn()], vec!["A".into(), "B".into()])
                .unwrap();
            Self {
                bus: EventBus::new(),
                player: Player::new(session.num_frames()),
                session,
                settings: AppSettings::default(),
                show_settings: false,
            }
        }

        /// Emit, poll and handle; returns the merged result of the last event.
        fn send<E: crate::core::event_bus::Event>(&mut self, event: E) -> EventResult {
            self.bus.emit(event);
            let mut last = None;
            for ev in self.bus.poll() {
                last = handle_app_event(
                    &ev,
                    &mut self.player,
                    &mut self.session,
                    &mut self.settings,
                    &mut self.show_settings,
                );
            }
            last.expect("event not handled")
        }

        fn id(&self, index: usize) -> DockId {
            self.session.dock_ids()[index]
        }
    }

    #[test]
    fn frame_events_reach_every_dock() {
        let mut h = Harness::new();
        h.send(SetFrameEvent(3));
        assert_eq!(h.player.frame(), 3);
        assert!(h.session.docks().all(|d| d.frame() == 3));

        h.send(StepForwardEvent);
        h.send(StepForwardEvent);
        assert_eq!(h.session.frame(), 4);
        h.send(StepBackwardEvent);
        assert_eq!(h.session.frame(), 3);
    }

    #[test]
    fn fps_is_clamped_and_persisted() {
        let mut h = Harness::new();
        h.send(SetFpsEvent(500));
        assert_eq!(h.player.fps(), 100);
        assert_eq!(h.settings.fps, 100);
    }

    #[test]
    fn cursor_event_updates_readouts() {
        let mut h = Harness::new();
        let a = h.id(0);
        h.send(CursorMovedEvent { dock: a, x: 2.2, y: 3.7 });
        assert_eq!(h.session.dock(a).unwrap().readout().value, 32.0);
        assert_eq!(h.session.dock(h.id(1)).unwrap().readout().value, 2.0);
    }

    #[test]
    fn view_change_lands_on_source_dock() {
        let mut h = Harness::new();
        let (a, b) = (h.id(0), h.id(1));
        let transform = crate::core::view_sync::ViewTransform {
            zoom: 2.0,
            pan: [6.0, -1.0],
        };
        h.send(ViewChangedEvent { dock: a, transform });
        assert_eq!(h.session.dock(a).unwrap().viewport.transform(), transform);
        assert_ne!(h.session.dock(b).unwrap().viewport.transform(), transform);

        h.send(SetViewSyncEvent(true));
        h.send(ViewChangedEvent { dock: a, transform });
        assert_eq!(h.session.dock(b).unwrap().viewport.transform(), transform);
    }

    #[test]
    fn duplicate_and_close_report_tabs() {
        let mut h = Harness::new();
        let a = h.id(0);
        let result = h.send(DuplicateDockEvent(a));
        assert_eq!(result.opened_docks.len(), 1);
        let copy = result.opened_docks[0];

        let result = h.send(CloseDockEvent(a));
        assert!(result.closed_docks.is_empty());
        assert!(result.status.is_some());

        let result = h.send(CloseDockEvent(copy));
        assert_eq!(result.closed_docks, vec![copy]);
    }

    #[test]
    fn non_finite_derived_result_warns() {
        let mut h = Harness::new();
        let result = h.send(CreateDerivedEvent {
            op: BinaryOp::Division,
            a: "B".into(),
            b: "A".into(),
        });
        let warning = result.warning.expect("warning");
        assert_eq!(warning.title, "Calculation error");
        assert!(result.opened_docks.is_empty());
        assert_eq!(h.session.len(), 2);

        let result = h.send(CreateDerivedEvent {
            op: BinaryOp::Sum,
            a: "A".into(),
            b: "B".into(),
        });
        assert_eq!(result.opened_docks.len(), 1);
        assert_eq!(result.show_operations, Some(false));
    }

    #[test]
    fn threshold_locks_colour_controls() {
        let mut h = Harness::new();
        let a = h.id(0);
        h.send(ArmThresholdEvent { dock: a, op: ThresholdOp::Greater });
        let result = h.send(SetColormapEvent { dock: a, cmap: Colormap::Plasma });
        assert!(result.status.is_some());
        assert_eq!(h.session.dock(a).unwrap().image_config(), ImageConfig::THRESHOLD_DISPLAY);

        h.send(CancelThresholdEvent(a));
        h.send(SetColormapEvent { dock: a, cmap: Colormap::Plasma });
        assert_eq!(h.session.dock(a).unwrap().image_config().cmap, Colormap::Plasma);
    }

    #[test]
    fn copy_paste_and_prefs() {
        let mut h = Harness::new();
        let (a, b) = (h.id(0), h.id(1));
        let result = h.send(PastePanelEvent { dock: b, kind: PanelKind::Threshold });
        assert!(result.status.is_some());

        h.send(ArmThresholdEvent { dock: a, op: ThresholdOp::Less });
        h.send(CopyPanelEvent { dock: a, kind: PanelKind::Threshold });
        h.send(PastePanelEvent { dock: b, kind: PanelKind::Threshold });
        assert_eq!(
            h.session.dock(b).unwrap().threshold_rule().map(|r| r.op),
            Some(ThresholdOp::Less)
        );

        h.send(SetViewSyncEvent(true));
        assert!(h.session.view_sync_enabled());
        assert!(h.settings.sync_views);
        h.send(SetCrosshairVisibleEvent(false));
        assert!(!h.session.crosshair_visible());
        h.send(ToggleSettingsEvent);
        assert!(h.show_settings);
    }

    #[test]
    fn unknown_events_are_not_handled() {
        #[derive(Clone, Debug)]
        struct Unrelated;
        let mut h = Harness::new();
        h.bus.emit(Unrelated);
        let events = h.bus.poll();
        assert!(
            handle_app_event(&events[0], &mut h.player, &mut h.session, &mut h.settings, &mut h.show_settings)
                .is_none()
        );
    }
}
