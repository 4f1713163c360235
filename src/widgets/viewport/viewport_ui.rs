//! Viewport widget - UI rendering

use eframe::egui;
use log::trace;

use super::ViewportState;
use super::viewport_events::{CursorMovedEvent, ResetViewEvent, ViewChangedEvent};
use crate::core::event_bus::EventEmitter;
use crate::entities::dock::ArrayDock;

const CROSSHAIR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 60, 60);
const OVERLAY_BG: egui::Color32 = egui::Color32::from_black_alpha(160);

/// GPU texture of one dock, re-uploaded only when the dock's pixels change.
#[derive(Default)]
pub struct ViewportTexture {
    handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl ViewportTexture {
    fn sync(&mut self, ctx: &egui::Context, dock: &ArrayDock) -> egui::TextureId {
        if let Some(handle) = &self.handle
            && self.revision == Some(dock.revision())
        {
            return handle.id();
        }

        let frame = dock.render();
        let image = egui::ColorImage::from_rgba_unmultiplied([frame.width, frame.height], &frame.rgba);
        trace!("Uploading {}x{} texture for {}", frame.width, frame.height, dock.id());
        let handle = match self.handle.take() {
            Some(mut handle) => {
                handle.set(image, egui::TextureOptions::NEAREST);
                handle
            }
            None => ctx.load_texture(format!("dock-{}", dock.id()), image, egui::TextureOptions::NEAREST),
        };
        let id = handle.id();
        self.handle = Some(handle);
        self.revision = Some(dock.revision());
        id
    }
}

/// Render one dock's image with crosshair and readout overlay.
///
/// Hover, drag and scroll are only reported as events. Pan/zoom is worked out
/// on a scratch copy of the viewport and lands on the dock once the
/// `ViewChangedEvent` is handled.
pub fn render(
    ui: &mut egui::Ui,
    dock: &mut ArrayDock,
    texture: &mut ViewportTexture,
    show_crosshair: bool,
    emitter: &EventEmitter,
) {
    let ctx = ui.ctx().clone();
    let (panel_rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let painter = ui.painter_at(panel_rect);
    painter.rect_filled(panel_rect, 0.0, egui::Color32::from_gray(20));

    dock.viewport.set_viewport_size(panel_rect.size());

    if response.double_clicked() {
        emitter.emit(ResetViewEvent(dock.id()));
    }
    let mut view = dock.viewport.clone();
    if handle_viewport_input(&ctx, panel_rect, &mut view, &response) {
        emitter.emit(ViewChangedEvent {
            dock: dock.id(),
            transform: view.transform(),
        });
    }

    if let Some(hover) = response.hover_pos()
        && ctx.input(|i| i.pointer.is_moving())
    {
        let image_pos = dock.viewport.screen_to_image(hover - panel_rect.left_top());
        emitter.emit(CursorMovedEvent {
            dock: dock.id(),
            x: f64::from(image_pos.x),
            y: f64::from(image_pos.y),
        });
    }

    let texture_id = texture.sync(&ctx, dock);
    let image_rect = dock.viewport.image_screen_rect().translate(panel_rect.left_top().to_vec2());
    painter.image(
        texture_id,
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if show_crosshair {
        draw_crosshair(&painter, panel_rect, dock);
        draw_readout(&painter, panel_rect, dock);
    }
}

/// Scroll zooms around the pointer, primary or middle drag pans.
/// Returns true when the view changed.
fn handle_viewport_input(
    ctx: &egui::Context,
    rect: egui::Rect,
    viewport_state: &mut ViewportState,
    response: &egui::Response,
) -> bool {
    let mut changed = false;

    if response.hovered() {
        let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y.abs() > 0.1
            && let Some(cursor_pos) = response.hover_pos()
        {
            viewport_state.handle_zoom(scroll_delta.y, cursor_pos - rect.left_top());
            changed = true;
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) || response.dragged_by(egui::PointerButton::Middle) {
        let delta = response.drag_delta();
        if delta.length() > 0.1 {
            viewport_state.handle_pan(delta);
            changed = true;
        }
    }

    if changed {
        ctx.request_repaint();
    }
    changed
}

fn draw_crosshair(painter: &egui::Painter, panel_rect: egui::Rect, dock: &ArrayDock) {
    let cursor = dock.cursor();
    let pos = dock
        .viewport
        .image_to_screen(egui::vec2(cursor.x as f32, cursor.y as f32))
        + panel_rect.left_top().to_vec2();
    let stroke = egui::Stroke::new(1.0, CROSSHAIR_COLOR);
    painter.hline(panel_rect.x_range(), pos.y, stroke);
    painter.vline(pos.x, panel_rect.y_range(), stroke);
}

fn draw_readout(painter: &egui::Painter, panel_rect: egui::Rect, dock: &ArrayDock) {
    let readout = dock.readout();
    let text = format!("{}\n{}\n{}", readout.value_text(), readout.x_text(), readout.y_text());
    let galley = painter.layout_no_wrap(text, egui::FontId::monospace(12.0), egui::Color32::WHITE);
    let pos = panel_rect.left_top() + egui::vec2(8.0, 8.0);
    let bg = egui::Rect::from_min_size(pos, galley.size()).expand(4.0);
    painter.rect_filled(bg, 3.0, OVERLAY_BG);
    painter.galley(pos, galley, egui::Color32::WHITE);
}
