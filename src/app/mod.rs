//! Application module - ViewerApp and related functionality.
//!
//! This module organizes the main application logic into focused submodules:
//! - `events` - Event bus polling, deferred results, keyboard input
//! - `layout` - Dock layout building and tab bookkeeping
//! - `run` - eframe::App implementation
//! - `tabs` - Tab rendering and the egui_dock TabViewer

mod events;
mod layout;
mod run;
mod tabs;

pub use tabs::DockTabs;

use std::collections::HashMap;

use egui_dock::DockState;
use log::{debug, info};

use crate::core::event_bus::EventBus;
use crate::core::player::Player;
use crate::dialogs::prefs::AppSettings;
use crate::dialogs::warning::Warning;
use crate::entities::dock::DockId;
use crate::entities::session::Session;
use crate::runner::ViewerOptions;
use crate::widgets::operations::OperationsForm;
use crate::widgets::status::StatusBar;
use crate::widgets::viewport::ViewportTexture;

/// Dock tab identifiers for the main UI layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DockTab {
    /// One array dock (original, copy or derived).
    Array(DockId),
    /// The "new derived array" form.
    Operations,
}

/// Main application state.
///
/// Owns the player, the session with every registered dock, the event bus
/// and the egui_dock layout. Only `settings` outlives the process; dock ids
/// are fresh per run, so the layout is rebuilt from the session on start.
pub struct ViewerApp {
    pub player: Player,
    pub session: Session,
    pub event_bus: EventBus,
    pub settings: AppSettings,
    pub dock_state: DockState<DockTab>,
    /// GPU textures keyed by dock, dropped when the dock closes.
    pub textures: HashMap<DockId, ViewportTexture>,
    pub operations: OperationsForm,
    pub status_bar: StatusBar,
    pub warning: Option<Warning>,
    pub show_settings: bool,
    pub reset_settings_pending: bool,
    /// Theme and font size last pushed to egui.
    pub applied_style: Option<(bool, f32)>,
}

impl ViewerApp {
    /// Build the app around an already validated session.
    ///
    /// Persisted settings are loaded from `storage` first; explicit options
    /// (CLI flags or embedding caller) override them.
    pub fn new(session: Session, options: &ViewerOptions, storage: Option<&dyn eframe::Storage>) -> Self {
        let mut settings: AppSettings = storage
            .and_then(|s| s.get_string(eframe::APP_KEY))
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    debug!("Ignoring stored settings: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        if let Some(fps) = options.fps {
            settings.fps = fps;
        }
        if let Some(sync) = options.sync_views {
            settings.sync_views = sync;
        }

        let mut app = Self {
            player: Player::new(session.num_frames()),
            dock_state: Self::build_dock_state(&session),
            session,
            event_bus: EventBus::new(),
            settings,
            textures: HashMap::new(),
            operations: OperationsForm::default(),
            status_bar: StatusBar::new(),
            warning: None,
            show_settings: false,
            reset_settings_pending: false,
            applied_style: None,
        };
        app.apply_settings();

        let frame = app.player.set_frame(options.start_frame);
        app.session.set_frame(frame);
        if options.autoplay {
            app.player.play();
        }

        info!(
            "Viewer ready: {} dock(s), shape {}",
            app.session.len(),
            app.session.shape().map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
        );
        app
    }

    /// Push settings into the player and session.
    pub fn apply_settings(&mut self) {
        self.player.set_fps(self.settings.fps);
        self.settings.fps = self.player.fps();
        self.session.set_view_sync(self.settings.sync_views);
        self.session.set_crosshair_visible(self.settings.show_crosshair);
        self.session.set_default_colormap(self.settings.default_cmap);
    }

    /// Push theme and font size to egui when they differ from what was last
    /// applied. Returns true if the style was (re)applied.
    pub fn sync_style(&mut self, ctx: &eframe::egui::Context) -> bool {
        let wanted = (self.settings.dark_mode, self.settings.font_size);
        if self.applied_style == Some(wanted) {
            return false;
        }
        self.settings.apply_style(ctx);
        self.applied_style = Some(wanted);
        debug!("Style applied: dark={}, font={}", wanted.0, wanted.1);
        true
    }

    /// Reset all settings to defaults.
    pub fn reset_settings(&mut self) {
        info!("Resetting settings to default");
        self.settings = AppSettings::default();
        self.apply_settings();
    }
}
