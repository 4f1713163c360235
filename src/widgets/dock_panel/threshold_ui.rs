use eframe::egui;

use super::clipboard_buttons;
use crate::core::event_bus::EventEmitter;
use crate::entities::dock::ArrayDock;
use crate::entities::dock_events::{ArmThresholdEvent, CancelThresholdEvent, SetThresholdCutoffEvent};
use crate::entities::panels::{DockPanel, ThresholdPanel};
use crate::entities::threshold::ThresholdOp;

pub fn render(ui: &mut egui::Ui, dock: &ArrayDock, can_paste: bool, emitter: &EventEmitter) {
    let id = dock.id();
    let panel = dock.threshold_panel();

    ui.horizontal(|ui| {
        ui.strong(ThresholdPanel::KIND.name());
        clipboard_buttons(ui, id, ThresholdPanel::KIND, can_paste, emitter);

        ui.menu_button("Select operation", |ui| {
            for op in ThresholdOp::ALL {
                if ui.button(format!("{}  ({})", op.description(), op.symbol())).clicked() {
                    emitter.emit(ArmThresholdEvent { dock: id, op });
                }
            }
        });
    });

    let Some(rule) = panel.rule() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.label(rule.label());
        let (lo, hi) = panel.cutoff_range();
        let mut cutoff = panel.cutoff();
        if ui
            .add(
                egui::DragValue::new(&mut cutoff)
                    .speed(f64::from(panel.step()))
                    .range(lo..=hi),
            )
            .changed()
        {
            emitter.emit(SetThresholdCutoffEvent { dock: id, cutoff });
        }
        if ui.button("Cancel").clicked() {
            emitter.emit(CancelThresholdEvent(id));
        }
    });
}
