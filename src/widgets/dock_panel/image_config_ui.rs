use eframe::egui;

use super::clipboard_buttons;
use crate::core::event_bus::EventEmitter;
use crate::entities::colormap::Colormap;
use crate::entities::dock::ArrayDock;
use crate::entities::dock_events::{ResetColourRangeEvent, SetColormapEvent, SetVmaxEvent, SetVminEvent};
use crate::entities::panels::{DockPanel, ImageConfigPanel};

/// Colormap and colour range controls. Disabled while a threshold is armed.
pub fn render(ui: &mut egui::Ui, dock: &ArrayDock, can_paste: bool, emitter: &EventEmitter) {
    let id = dock.id();
    let panel = dock.image_panel();
    let config = panel.config();
    let (data_min, data_max) = panel.data_range();

    ui.horizontal(|ui| {
        ui.strong(ImageConfigPanel::KIND.name());
        clipboard_buttons(ui, id, ImageConfigPanel::KIND, can_paste && panel.is_enabled(), emitter);
    });

    ui.add_enabled_ui(panel.is_enabled(), |ui| {
        ui.horizontal(|ui| {
            let mut cmap = config.cmap;
            egui::ComboBox::from_id_salt(("cmap", id))
                .selected_text(cmap.name())
                .show_ui(ui, |ui| {
                    for option in Colormap::ALL {
                        ui.selectable_value(&mut cmap, option, option.name());
                    }
                });
            if cmap != config.cmap {
                emitter.emit(SetColormapEvent { dock: id, cmap });
            }

            let speed = f64::from(panel.step());
            let mut vmin = config.vmin;
            ui.label("vmin");
            if ui
                .add(egui::DragValue::new(&mut vmin).speed(speed).range(data_min..=config.vmax))
                .changed()
            {
                emitter.emit(SetVminEvent { dock: id, value: vmin });
            }

            let mut vmax = config.vmax;
            ui.label("vmax");
            if ui
                .add(egui::DragValue::new(&mut vmax).speed(speed).range(config.vmin..=data_max))
                .changed()
            {
                emitter.emit(SetVmaxEvent { dock: id, value: vmax });
            }

            if ui
                .button("Reset")
                .on_hover_text("Stretch the colour range over the full data range")
                .clicked()
            {
                emitter.emit(ResetColourRangeEvent(id));
            }
        });
    });
}
