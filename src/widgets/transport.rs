//! Transport bar: frame slider, play/pause, fps and the global toggles.

use eframe::egui::{self, Ui};

use crate::core::event_bus::BoxedEvent;
use crate::core::player::{FPS_MAX, FPS_MIN, Player};
use crate::core::player_events::{SetFpsEvent, SetFrameEvent, StepBackwardEvent, StepForwardEvent, TogglePlayPauseEvent};
use crate::dialogs::prefs::prefs_events::{SetCrosshairVisibleEvent, SetViewSyncEvent, ToggleSettingsEvent};
use crate::widgets::operations::operation_events::OpenOperationsEvent;

pub fn render(
    ui: &mut Ui,
    player: &Player,
    show_crosshair: bool,
    sync_views: bool,
    mut dispatch: impl FnMut(BoxedEvent),
) {
    ui.horizontal(|ui| {
        if ui.button("⏴").on_hover_text("Previous frame (Left)").clicked() {
            dispatch(Box::new(StepBackwardEvent));
        }
        let play_icon = if player.is_playing() { "⏸" } else { "▶" };
        if ui.button(play_icon).on_hover_text("Play/Pause (Space)").clicked() {
            dispatch(Box::new(TogglePlayPauseEvent));
        }
        if ui.button("⏵").on_hover_text("Next frame (Right)").clicked() {
            dispatch(Box::new(StepForwardEvent));
        }

        ui.separator();

        let last = player.num_frames().saturating_sub(1);
        let mut frame = player.frame();
        let slider_width = (ui.available_width() - 420.0).max(120.0);
        ui.spacing_mut().slider_width = slider_width;
        if ui
            .add_enabled(last > 0, egui::Slider::new(&mut frame, 0..=last).text("frame"))
            .changed()
        {
            dispatch(Box::new(SetFrameEvent(frame)));
        }

        ui.separator();

        let mut fps = player.fps();
        ui.label("FPS");
        if ui
            .add(egui::DragValue::new(&mut fps).range(FPS_MIN..=FPS_MAX))
            .changed()
        {
            dispatch(Box::new(SetFpsEvent(fps)));
        }

        ui.separator();

        let mut crosshair = show_crosshair;
        if ui.checkbox(&mut crosshair, "Crosshair").changed() {
            dispatch(Box::new(SetCrosshairVisibleEvent(crosshair)));
        }
        let mut sync = sync_views;
        if ui.checkbox(&mut sync, "Sync views").changed() {
            dispatch(Box::new(SetViewSyncEvent(sync)));
        }

        ui.separator();

        if ui.button("Operations…").clicked() {
            dispatch(Box::new(OpenOperationsEvent));
        }
        if ui.button("⚙").on_hover_text("Settings").clicked() {
            dispatch(Box::new(ToggleSettingsEvent));
        }
    });
}
