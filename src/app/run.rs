//! Main application loop - eframe::App implementation.
//!
//! Contains the core update() method that runs each frame:
//! - Playback tick and event processing
//! - UI rendering (transport, dock panels, dialogs)
//! - Input handling
//! - Settings persistence

use std::time::Instant;

use eframe::egui;
use egui_dock::{DockArea, DockState};
use log::trace;

use crate::app::{DockTabs, ViewerApp};
use crate::core::player_events::SetFrameEvent;
use crate::dialogs::prefs::render_settings_window;
use crate::dialogs::warning::render_warning;
use crate::widgets;

impl eframe::App for ViewerApp {
    /// Main frame update - called every frame by eframe.
    ///
    /// Flow:
    /// 1. Apply theme and font settings when they changed
    /// 2. Playback tick, then process events
    /// 3. Render UI (status, transport, dock panels, dialogs)
    /// 4. Handle keyboard input
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_style(ctx);
        self.session.set_default_colormap(self.settings.default_cmap);

        // Playback and scrubbing share one path through SetFrameEvent.
        let now = Instant::now();
        if let Some(new_frame) = self.player.update(now) {
            self.event_bus.emit(SetFrameEvent(new_frame));
        }

        self.handle_events();

        if self.reset_settings_pending {
            self.reset_settings();
            self.reset_settings_pending = false;
        }

        if let Some(wait) = self.player.time_to_next_tick(now) {
            ctx.request_repaint_after(wait);
        }

        // Status bar (bottom panel)
        self.status_bar.render(ctx, &self.session, &self.player);

        egui::TopBottomPanel::top("transport").show(ctx, |ui| {
            widgets::transport::render(
                ui,
                &self.player,
                self.settings.show_crosshair,
                self.settings.sync_views,
                |evt| self.event_bus.emit_boxed(evt),
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let dock_style = egui_dock::Style::from_egui(ctx.style().as_ref());
            let mut dock_state = std::mem::replace(&mut self.dock_state, DockState::new(Vec::new()));
            {
                let mut tabs = DockTabs { app: self };
                DockArea::new(&mut dock_state)
                    .style(dock_style)
                    .show_close_buttons(false)
                    .show_inside(ui, &mut tabs);
            }
            self.dock_state = dock_state;
        });

        // Process keyboard input after panels had a chance to take focus
        self.handle_keyboard_input(ctx);

        if self.show_settings {
            render_settings_window(ctx, &mut self.show_settings, &mut self.settings, &self.event_bus);
        }

        render_warning(ctx, &mut self.warning);

        // Events emitted by this frame's widgets are handled on the next one
        if self.event_bus.queue_len() > 0 {
            ctx.request_repaint();
        }
    }

    /// Save app settings to persistent storage.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.fps = self.player.fps();
        if let Ok(json) = serde_json::to_string(&self.settings) {
            storage.set_string(eframe::APP_KEY, json);
            trace!(
                "Settings saved: FPS={}, sync={}, crosshair={}",
                self.settings.fps,
                self.settings.sync_views,
                self.settings.show_crosshair
            );
        }
    }
}
