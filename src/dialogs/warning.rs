//! Blocking warning dialog (e.g. a derived array with non-finite values).

use eframe::egui;

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub title: String,
    pub message: String,
}

impl Warning {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Show `pending` as a modal dialog; clears it once acknowledged.
///
/// The modal covers the whole window, so nothing underneath takes pointer
/// input until the dialog is closed (OK, Enter, Escape or a click outside).
pub fn render_warning(ctx: &egui::Context, pending: &mut Option<Warning>) {
    let Some(warning) = pending.as_ref() else {
        return;
    };

    let mut acknowledged = false;
    let modal = egui::Modal::new(egui::Id::new("warning_dialog")).show(ctx, |ui| {
        ui.set_max_width(360.0);
        ui.heading(warning.title.as_str());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("⚠").size(24.0).color(egui::Color32::YELLOW));
            ui.label(warning.message.as_str());
        });
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
    });

    if acknowledged || modal.should_close() || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
        *pending = None;
    }
}
