use eframe::egui;

use crate::core::player::Player;
use crate::entities::session::Session;

/// Status bar: last message on the left, session summary on the right.
#[derive(Debug, Default)]
pub struct StatusBar {
    pub current_message: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.current_message = message.into();
    }

    pub fn render(&self, ctx: &egui::Context, session: &Session, player: &Player) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.current_message.is_empty() {
                    ui.monospace("Ready");
                } else {
                    ui.monospace(self.current_message.as_str());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.monospace(format!("{:>3} fps", player.fps()));
                    ui.separator();
                    ui.monospace(format!(
                        "frame {:>4}/{:<4}",
                        player.frame(),
                        player.num_frames().saturating_sub(1)
                    ));
                    ui.separator();
                    match session.shape() {
                        Some(shape) => ui.monospace(format!("shape {}", shape)),
                        None => ui.monospace("shape ---"),
                    };
                    ui.separator();
                    ui.monospace(format!("{} dock(s)", session.len()));
                });
            });
        });
    }
}
