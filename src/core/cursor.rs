//! Shared cursor: one pixel position mirrored in every dock.

use serde::{Deserialize, Serialize};

use crate::entities::stack::StackShape;

/// Cursor position in image coordinates. After snapping, both components
/// sit on a pixel centre (`index + 0.5`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer pixel indices (truncating) used for value lookup.
    pub fn pixel(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

/// Snap a point in image coordinates to the nearest pixel centre within a
/// `width` x `height` image.
pub fn snap_to_pixel(x: f64, y: f64, width: usize, height: usize) -> CursorPosition {
    let snap = |v: f64, len: usize| {
        let last = len.saturating_sub(1) as f64;
        let v = if v.is_finite() { v } else { 0.0 };
        (v - 0.5).round().clamp(0.0, last) + 0.5
    };
    CursorPosition {
        x: snap(x, width),
        y: snap(y, height),
    }
}

/// What a dock shows at the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    pub x: i64,
    pub y: i64,
    pub value: f32,
}

impl CursorReadout {
    pub fn value_text(&self) -> String {
        format!("Value={:.3}", self.value)
    }

    pub fn x_text(&self) -> String {
        format!("X={}", self.x)
    }

    pub fn y_text(&self) -> String {
        format!("Y={}", self.y)
    }
}

/// Session-wide cursor state.
#[derive(Debug, Clone)]
pub struct CursorSync {
    position: CursorPosition,
    visible: bool,
}

impl Default for CursorSync {
    fn default() -> Self {
        Self {
            position: CursorPosition::default(),
            visible: true,
        }
    }
}

impl CursorSync {
    pub fn position(&self) -> CursorPosition {
        self.position
    }

    /// Snap `(x, y)` against `shape` and store it as the shared position.
    pub fn move_to(&mut self, x: f64, y: f64, shape: StackShape) -> CursorPosition {
        self.position = snap_to_pixel(x, y, shape.width, shape.height);
        self.position
    }

    pub fn set_position(&mut self, position: CursorPosition) {
        self.position = position;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_nearest_centre() {
        let p = snap_to_pixel(3.2, 7.9, 10, 10);
        assert_eq!(p, CursorPosition::new(3.5, 7.5));
        assert_eq!(p.pixel(), (3, 7));
    }

    #[test]
    fn clamps_to_image() {
        assert_eq!(snap_to_pixel(-40.0, 2.0, 8, 4), CursorPosition::new(0.5, 1.5));
        assert_eq!(snap_to_pixel(100.0, 100.0, 8, 4), CursorPosition::new(7.5, 3.5));
        assert_eq!(snap_to_pixel(f64::NAN, 1.0, 8, 4).x, 0.5);
    }

    #[test]
    fn readout_formatting() {
        let readout = CursorReadout {
            x: 4,
            y: 9,
            value: 1.23456,
        };
        assert_eq!(readout.value_text(), "Value=1.235");
        assert_eq!(readout.x_text(), "X=4");
        assert_eq!(readout.y_text(), "Y=9");
    }

    #[test]
    fn move_uses_shape_bounds() {
        let mut cursor = CursorSync::default();
        let p = cursor.move_to(63.9, -1.0, StackShape::new(5, 32, 64));
        assert_eq!(p, CursorPosition::new(63.5, 0.5));
        assert_eq!(cursor.position(), p);
        assert!(cursor.is_visible());
    }
}
