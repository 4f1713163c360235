use eframe::egui;
use log::{debug, trace};

use crate::core::view_sync::ViewTransform;

// Zoom constants
const ZOOM_STEP: f32 = 0.1;
const ZOOM_IN_FACTOR: f32 = 1.0 + ZOOM_STEP;
const ZOOM_OUT_FACTOR: f32 = 1.0 / ZOOM_IN_FACTOR;
const ZOOM_MIN: f32 = 0.01;
const ZOOM_MAX: f32 = 200.0;

/// Viewport mode
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ViewportMode {
    /// User controls zoom/pan, nothing auto-adjusts
    Manual,
    /// Image fits the panel, re-fits on resize
    AutoFit,
}

/// Pan/zoom state of one dock's image view.
///
/// Screen coordinates are relative to the top-left of the panel; image
/// coordinates run `0..width` horizontally and `0..height` downwards, one
/// unit per pixel.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ViewportState {
    pub zoom: f32,
    pub pan: egui::Vec2,
    pub mode: ViewportMode,
    #[serde(skip)]
    pub image_size: egui::Vec2,
    #[serde(skip)]
    pub viewport_size: egui::Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            mode: ViewportMode::AutoFit,
            image_size: egui::Vec2::new(1.0, 1.0),
            viewport_size: egui::Vec2::new(1.0, 1.0),
        }
    }
}

impl ViewportState {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image_size: egui::vec2(width as f32, height as f32),
            ..Self::default()
        }
    }

    /// Back to fit-to-panel with no pan.
    pub fn reset(&mut self) {
        debug!("Viewport reset to AutoFit");
        self.mode = ViewportMode::AutoFit;
        self.apply_fit();
    }

    /// Update viewport size (called every layout pass)
    pub fn set_viewport_size(&mut self, size: egui::Vec2) {
        if size == self.viewport_size {
            return;
        }
        self.viewport_size = size;
        if self.mode == ViewportMode::AutoFit {
            self.apply_fit();
        }
    }

    fn apply_fit(&mut self) {
        if self.image_size.x <= 0.0 || self.image_size.y <= 0.0 {
            return;
        }
        let scale_x = self.viewport_size.x / self.image_size.x;
        let scale_y = self.viewport_size.y / self.image_size.y;
        self.zoom = scale_x.min(scale_y).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = egui::Vec2::ZERO;
    }

    /// Zoom around the cursor so the point under it stays put (switches to Manual).
    pub fn handle_zoom(&mut self, zoom_delta: f32, cursor_pos: egui::Vec2) {
        if zoom_delta.abs() < 0.001 {
            return;
        }
        self.mode = ViewportMode::Manual;

        let old_zoom = self.zoom;
        let factor = if zoom_delta > 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);

        let ratio = self.zoom / old_zoom;
        let cursor_to_center = cursor_pos - self.viewport_size * 0.5;
        self.pan = cursor_to_center - (cursor_to_center - self.pan) * ratio;
        trace!("Zoom: {:.2}x, Pan: ({:.1}, {:.1})", self.zoom, self.pan.x, self.pan.y);
    }

    /// Pan by a screen-space delta (switches to Manual).
    pub fn handle_pan(&mut self, delta: egui::Vec2) {
        self.mode = ViewportMode::Manual;
        self.pan += delta;
        trace!("Pan: ({:.1}, {:.1})", self.pan.x, self.pan.y);
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan: [self.pan.x, self.pan.y],
        }
    }

    /// Take over another dock's view without treating it as a user change.
    pub fn apply_transform(&mut self, transform: ViewTransform) {
        self.mode = ViewportMode::Manual;
        self.zoom = transform.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = egui::vec2(transform.pan[0], transform.pan[1]);
    }

    /// Image coordinates to panel-relative screen coordinates.
    pub fn image_to_screen(&self, image_pos: egui::Vec2) -> egui::Vec2 {
        let centered = image_pos - self.image_size * 0.5;
        centered * self.zoom + self.pan + self.viewport_size * 0.5
    }

    /// Panel-relative screen coordinates to (unbounded) image coordinates.
    pub fn screen_to_image(&self, screen_pos: egui::Vec2) -> egui::Vec2 {
        let centered = screen_pos - self.viewport_size * 0.5 - self.pan;
        centered / self.zoom + self.image_size * 0.5
    }

    /// Image bounds in panel-relative screen space.
    pub fn image_screen_rect(&self) -> egui::Rect {
        let min = self.image_to_screen(egui::Vec2::ZERO);
        let max = self.image_to_screen(self.image_size);
        egui::Rect::from_min_max(min.to_pos2(), max.to_pos2())
    }
}
