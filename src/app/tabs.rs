//! Tab rendering methods for ViewerApp.
//!
//! Every array dock tab shows its two control panels, the dock actions and
//! the image viewport. The operations tab hosts the derived-array form.
//!
//! Also includes DockTabs wrapper for egui_dock TabViewer.

use eframe::egui;
use egui_dock::TabViewer;

use crate::app::{DockTab, ViewerApp};
use crate::entities::dock::DockId;
use crate::entities::dock_events::{CloseDockEvent, DuplicateDockEvent};
use crate::entities::panels::PanelKind;
use crate::widgets;
use crate::widgets::viewport::viewport_events::ResetViewEvent;

impl ViewerApp {
    /// Render one array dock: panels, actions and viewport.
    pub fn render_array_tab(&mut self, ui: &mut egui::Ui, id: DockId) {
        let emitter = self.event_bus.emitter();
        let can_paste_image = self.session.has_clipboard(PanelKind::ImageConfiguration);
        let can_paste_threshold = self.session.has_clipboard(PanelKind::Threshold);
        let show_crosshair = self.session.crosshair_visible();

        let Ok(dock) = self.session.dock_mut(id) else {
            ui.centered_and_justified(|ui| {
                ui.label("Dock closed");
            });
            return;
        };

        ui.horizontal_wrapped(|ui| {
            widgets::dock_panel::render_image_config(ui, dock, can_paste_image, &emitter);
            ui.separator();
            widgets::dock_panel::render_threshold(ui, dock, can_paste_threshold, &emitter);
        });

        ui.horizontal(|ui| {
            if dock.can_duplicate() && ui.button("Duplicate").clicked() {
                emitter.emit(DuplicateDockEvent(id));
            }
            if ui
                .button("Reset view")
                .on_hover_text("Fit the image to the panel (double-click)")
                .clicked()
            {
                emitter.emit(ResetViewEvent(id));
            }
            if dock.is_closable() && ui.button("Close").clicked() {
                emitter.emit(CloseDockEvent(id));
            }
        });
        ui.separator();

        let texture = self.textures.entry(id).or_default();
        widgets::viewport::render(ui, dock, texture, show_crosshair, &emitter);
    }

    /// Render the derived-array form.
    pub fn render_operations_tab(&mut self, ui: &mut egui::Ui) {
        let emitter = self.event_bus.emitter();
        widgets::operations::render(ui, &mut self.operations, &self.session, &emitter);
    }
}

/// Wrapper struct for egui_dock TabViewer implementation.
/// Holds mutable reference to ViewerApp for rendering tabs.
pub struct DockTabs<'a> {
    pub app: &'a mut ViewerApp,
}

impl<'a> TabViewer for DockTabs<'a> {
    type Tab = DockTab;

    fn title(&mut self, tab: &mut DockTab) -> egui::WidgetText {
        match tab {
            DockTab::Array(id) => match self.app.session.dock(*id) {
                Ok(dock) => dock.display_title().into(),
                Err(_) => "Closed".into(),
            },
            DockTab::Operations => "Operations".into(),
        }
    }

    fn id(&mut self, tab: &mut DockTab) -> egui::Id {
        egui::Id::new(*tab)
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut DockTab) {
        match tab {
            DockTab::Array(id) => self.app.render_array_tab(ui, *id),
            DockTab::Operations => self.app.render_operations_tab(ui),
        }
    }
}
