use eframe::egui;

use super::prefs_events::{ResetSettingsEvent, SetCrosshairVisibleEvent, SetViewSyncEvent};
use crate::core::event_bus::EventBus;
use crate::core::player::{FPS_DEFAULT, FPS_MAX, FPS_MIN};
use crate::core::player_events::SetFpsEvent;
use crate::entities::colormap::Colormap;

/// Settings categories
#[derive(Debug, Clone, Copy, PartialEq)]
enum SettingsCategory {
    Playback,
    Display,
}

impl SettingsCategory {
    const ALL: [SettingsCategory; 2] = [SettingsCategory::Playback, SettingsCategory::Display];

    fn as_str(&self) -> &'static str {
        match self {
            SettingsCategory::Playback => "Playback",
            SettingsCategory::Display => "Display",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Application settings, persisted through eframe storage.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AppSettings {
    // Playback
    pub fps: u32,

    // Sync
    pub show_crosshair: bool,
    pub sync_views: bool,

    // UI
    pub dark_mode: bool,
    pub font_size: f32,
    /// Colormap for newly created docks.
    pub default_cmap: Colormap,

    // Internal
    pub selected_settings_category: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            fps: FPS_DEFAULT,
            show_crosshair: true,
            sync_views: false,
            dark_mode: true,
            font_size: 13.0,
            default_cmap: Colormap::Gray,
            selected_settings_category: Some("Playback".to_string()),
        }
    }
}

impl AppSettings {
    /// Apply font size and theme to the egui context.
    pub fn apply_style(&self, ctx: &egui::Context) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        let mut style = (*ctx.style()).clone();
        for font in style.text_styles.values_mut() {
            font.size = self.font_size;
        }
        ctx.set_style(style);
    }
}

/// Render Playback settings category
fn render_playback_settings(ui: &mut egui::Ui, settings: &mut AppSettings, bus: &EventBus) {
    ui.heading("Playback");
    ui.add_space(8.0);

    ui.label("Frames per second:");
    if ui
        .add(egui::Slider::new(&mut settings.fps, FPS_MIN..=FPS_MAX).suffix(" fps"))
        .changed()
    {
        bus.emit(SetFpsEvent(settings.fps));
    }

    ui.add_space(16.0);
    ui.heading("Synchronization");
    ui.add_space(8.0);

    if ui
        .checkbox(&mut settings.show_crosshair, "Show crosshair and value readout")
        .changed()
    {
        bus.emit(SetCrosshairVisibleEvent(settings.show_crosshair));
    }
    if ui
        .checkbox(&mut settings.sync_views, "Synchronize pan/zoom between docks")
        .changed()
    {
        bus.emit(SetViewSyncEvent(settings.sync_views));
    }
}

/// Render Display settings category
fn render_display_settings(ui: &mut egui::Ui, settings: &mut AppSettings) {
    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label("Font Size:");
    ui.add(
        egui::Slider::new(&mut settings.font_size, 10.0..=18.0)
            .suffix(" px")
            .step_by(0.5),
    );
    ui.add_space(8.0);
    ui.checkbox(&mut settings.dark_mode, "Dark Mode");

    ui.add_space(16.0);
    ui.label("Colormap for new docks:");
    egui::ComboBox::from_id_salt("prefs_default_cmap")
        .selected_text(settings.default_cmap.name())
        .show_ui(ui, |ui| {
            for cmap in Colormap::ALL {
                ui.selectable_value(&mut settings.default_cmap, cmap, cmap.name());
            }
        });
}

/// Render settings window
pub fn render_settings_window(
    ctx: &egui::Context,
    show_settings: &mut bool,
    settings: &mut AppSettings,
    bus: &EventBus,
) {
    let mut selected = settings
        .selected_settings_category
        .as_deref()
        .and_then(SettingsCategory::from_str)
        .unwrap_or(SettingsCategory::Playback);

    egui::Window::new("Settings")
        .id(egui::Id::new("settings_window"))
        .open(show_settings)
        .default_size([520.0, 320.0])
        .resizable(true)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.set_width(120.0);
                    ui.add_space(4.0);
                    for category in SettingsCategory::ALL {
                        if ui
                            .selectable_label(selected == category, category.as_str())
                            .clicked()
                        {
                            selected = category;
                        }
                    }
                    ui.add_space(16.0);
                    if ui.button("Reset to defaults").clicked() {
                        bus.emit(ResetSettingsEvent);
                    }
                });

                ui.separator();

                ui.vertical(|ui| {
                    ui.add_space(8.0);
                    match selected {
                        SettingsCategory::Playback => render_playback_settings(ui, settings, bus),
                        SettingsCategory::Display => render_display_settings(ui, settings),
                    }
                });
            });
        });

    settings.selected_settings_category = Some(selected.as_str().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"fps": 42, "default_cmap": "magma"}"#).unwrap();
        assert_eq!(settings.fps, 42);
        assert_eq!(settings.default_cmap, Colormap::Magma);
        assert!(settings.show_crosshair);
        assert!(!settings.sync_views);
    }

    #[test]
    fn category_names_round_trip() {
        for category in SettingsCategory::ALL {
            assert_eq!(SettingsCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(SettingsCategory::from_str("Web Server"), None);
    }
}
