use eframe::egui;

use super::OperationsForm;
use super::operation_events::{CancelOperationsEvent, CreateDerivedEvent};
use crate::core::event_bus::EventEmitter;
use crate::entities::operation::BinaryOp;
use crate::entities::session::Session;

pub fn render(ui: &mut egui::Ui, form: &mut OperationsForm, session: &Session, emitter: &EventEmitter) {
    form.refresh(session);

    egui::Grid::new("operations_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Operation");
            egui::ComboBox::from_id_salt("operation_kind")
                .selected_text(form.op.description())
                .show_ui(ui, |ui| {
                    for op in BinaryOp::ALL {
                        ui.selectable_value(&mut form.op, op, format!("{} ({})", op.description(), op.symbol()));
                    }
                });
            ui.end_row();

            ui.label("Array A");
            let mut picked_a = None;
            egui::ComboBox::from_id_salt("operand_a")
                .selected_text(form.a().unwrap_or("-"))
                .show_ui(ui, |ui| {
                    for title in form.a_choices() {
                        if ui.selectable_label(form.a() == Some(title.as_str()), title).clicked() {
                            picked_a = Some(title.clone());
                        }
                    }
                });
            if let Some(title) = picked_a {
                form.select_a(&title, session);
            }
            ui.end_row();

            ui.label("Array B");
            let mut picked_b = None;
            egui::ComboBox::from_id_salt("operand_b")
                .selected_text(form.b().unwrap_or("-"))
                .show_ui(ui, |ui| {
                    for title in form.b_choices() {
                        if ui.selectable_label(form.b() == Some(title.as_str()), title).clicked() {
                            picked_b = Some(title.clone());
                        }
                    }
                });
            if let Some(title) = picked_b {
                form.select_b(&title);
            }
            ui.end_row();
        });

    if let Some((op, a, b)) = form.request() {
        ui.add_space(4.0);
        ui.weak(format!("Result: {}", op.derived_title(&a, &b)));
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let request = form.request();
        if ui.add_enabled(request.is_some(), egui::Button::new("Create")).clicked()
            && let Some((op, a, b)) = request
        {
            emitter.emit(CreateDerivedEvent { op, a, b });
        }
        if ui.button("Cancel").clicked() {
            emitter.emit(CancelOperationsEvent);
        }
    });
}
