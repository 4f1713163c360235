//! Per-dock control panels drawn above the image.

mod image_config_ui;
mod threshold_ui;

pub use image_config_ui::render as render_image_config;
pub use threshold_ui::render as render_threshold;

use eframe::egui;

use crate::core::event_bus::EventEmitter;
use crate::entities::dock::DockId;
use crate::entities::dock_events::{CopyPanelEvent, PastePanelEvent};
use crate::entities::panels::PanelKind;

/// Copy / Paste buttons shared by every panel.
fn clipboard_buttons(ui: &mut egui::Ui, dock: DockId, kind: PanelKind, can_paste: bool, emitter: &EventEmitter) {
    if ui
        .small_button("Copy")
        .on_hover_text(format!("Copy {} settings", kind.name()))
        .clicked()
    {
        emitter.emit(CopyPanelEvent { dock, kind });
    }
    if ui
        .add_enabled(can_paste, egui::Button::new("Paste").small())
        .on_hover_text(format!("Paste copied {} settings", kind.name()))
        .clicked()
    {
        emitter.emit(PastePanelEvent { dock, kind });
    }
}
