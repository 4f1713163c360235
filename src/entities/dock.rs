//! Array dock: one stack plus everything needed to display it.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::cursor::{CursorPosition, CursorReadout};
use crate::entities::colormap::Colormap;
use crate::entities::panels::{DockPanel, ImageConfig, ImageConfigPanel, ThresholdPanel};
use crate::entities::stack::{Stack, StackShape};
use crate::entities::threshold::{ThresholdOp, ThresholdRule};
use crate::error::{Result, ViewerError};
use crate::widgets::viewport::ViewportState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DockId(Uuid);

impl DockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a dock's stack came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DockOrigin {
    /// Registered by the caller.
    Original,
    /// Produced by a binary operation.
    Derived,
}

/// RGBA pixels of the displayed frame, row-major, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ArrayDock {
    id: DockId,
    title: String,
    instance: usize,
    origin: DockOrigin,
    stack: Stack,
    frame: usize,
    image_panel: ImageConfigPanel,
    threshold_panel: ThresholdPanel,
    cursor: CursorPosition,
    readout: CursorReadout,
    pub viewport: ViewportState,
    /// Bumped whenever the displayed pixels change; the UI re-uploads its
    /// texture when this differs from what it last drew.
    revision: u64,
}

impl ArrayDock {
    pub fn new(stack: Stack, title: impl Into<String>, instance: usize, origin: DockOrigin) -> Self {
        Self::with_colormap(stack, title, instance, origin, Colormap::default())
    }

    pub fn with_colormap(
        stack: Stack,
        title: impl Into<String>,
        instance: usize,
        origin: DockOrigin,
        cmap: Colormap,
    ) -> Self {
        let shape = stack.shape();
        let image_panel = ImageConfigPanel::new(&stack, cmap);
        let threshold_panel = ThresholdPanel::new(&stack);
        let mut dock = Self {
            id: DockId::new(),
            title: title.into(),
            instance: instance.max(1),
            origin,
            stack,
            frame: 0,
            image_panel,
            threshold_panel,
            cursor: CursorPosition::default(),
            readout: CursorReadout {
                x: 0,
                y: 0,
                value: f32::NAN,
            },
            viewport: ViewportState::new(shape.width, shape.height),
            revision: 0,
        };
        dock.set_frame(0);
        dock
    }

    pub fn id(&self) -> DockId {
        self.id
    }

    /// Title shared by every instance of this array.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title with the instance suffix, e.g. `"A (2)"`.
    pub fn display_title(&self) -> String {
        if self.instance == 1 {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.instance)
        }
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn origin(&self) -> DockOrigin {
        self.origin
    }

    pub fn is_copy(&self) -> bool {
        self.instance > 1
    }

    pub fn is_derived(&self) -> bool {
        self.origin == DockOrigin::Derived
    }

    /// Original, non-copy dock: usable as an operand and never closable.
    pub fn is_original(&self) -> bool {
        !self.is_copy() && !self.is_derived()
    }

    pub fn is_closable(&self) -> bool {
        self.is_copy() || self.is_derived()
    }

    pub fn can_duplicate(&self) -> bool {
        !self.is_copy()
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn shape(&self) -> StackShape {
        self.stack.shape()
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn image_panel(&self) -> &ImageConfigPanel {
        &self.image_panel
    }

    pub fn threshold_panel(&self) -> &ThresholdPanel {
        &self.threshold_panel
    }

    pub fn image_config(&self) -> ImageConfig {
        self.image_panel.config()
    }

    pub fn threshold_rule(&self) -> Option<ThresholdRule> {
        self.threshold_panel.rule()
    }

    pub fn readout(&self) -> CursorReadout {
        self.readout
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.refresh_readout();
    }

    /// Show another frame (clamped to the stack) and refresh the readout.
    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame.min(self.shape().frames.saturating_sub(1));
        self.touch();
    }

    /// Move this dock's crosshair and recompute the value under it.
    pub fn sync_cursor(&mut self, position: CursorPosition) -> CursorReadout {
        self.cursor = position;
        self.refresh_readout();
        self.readout
    }

    fn refresh_readout(&mut self) {
        let (ix, iy) = self.cursor.pixel();
        let value = match (self.stack.sample(self.frame, iy, ix), self.threshold_panel.rule()) {
            (Some(raw), Some(rule)) => rule.apply_value(raw),
            (Some(raw), None) => raw,
            (None, _) => f32::NAN,
        };
        self.readout = CursorReadout { x: ix, y: iy, value };
    }

    /// Values currently on screen: the raw slice, or 0/1 under a threshold.
    pub fn display_values(&self) -> Array2<f32> {
        let slice = self.stack.frame(self.frame);
        match self.threshold_panel.rule() {
            Some(rule) => rule.apply(slice),
            None => slice.to_owned(),
        }
    }

    /// Colour-mapped RGBA pixels of the current frame.
    pub fn render(&self) -> RenderedFrame {
        let config = self.image_config();
        let values = self.display_values();
        let (height, width) = values.dim();
        let mut rgba = Vec::with_capacity(width * height * 4);
        for &v in values.iter() {
            rgba.extend_from_slice(&config.colour(v));
        }
        RenderedFrame { width, height, rgba }
    }

    // === Image configuration panel ===

    fn ensure_colour_editable(&self) -> Result<()> {
        if self.image_panel.is_enabled() {
            Ok(())
        } else {
            Err(ViewerError::ThresholdActive(self.display_title()))
        }
    }

    pub fn set_image_config(&mut self, config: ImageConfig) -> Result<()> {
        self.ensure_colour_editable()?;
        self.image_panel.set_config(config);
        self.touch();
        Ok(())
    }

    pub fn set_colormap(&mut self, cmap: Colormap) -> Result<()> {
        self.ensure_colour_editable()?;
        self.image_panel.set_cmap(cmap);
        self.touch();
        Ok(())
    }

    pub fn set_vmin(&mut self, vmin: f32) -> Result<()> {
        self.ensure_colour_editable()?;
        self.image_panel.set_vmin(vmin);
        self.touch();
        Ok(())
    }

    pub fn set_vmax(&mut self, vmax: f32) -> Result<()> {
        self.ensure_colour_editable()?;
        self.image_panel.set_vmax(vmax);
        self.touch();
        Ok(())
    }

    pub fn reset_colour_range(&mut self) -> Result<()> {
        self.ensure_colour_editable()?;
        self.image_panel.reset_to_data_range();
        self.touch();
        Ok(())
    }

    // === Threshold panel ===

    /// Arm (or switch) the threshold rule. The colour configuration is saved
    /// and locked on the first arm only.
    pub fn arm_threshold(&mut self, op: ThresholdOp) -> ThresholdRule {
        self.image_panel.lock_for_threshold();
        let rule = self.threshold_panel.arm(op);
        self.touch();
        rule
    }

    pub fn set_threshold_cutoff(&mut self, cutoff: f32) {
        self.threshold_panel.set_cutoff(cutoff);
        self.touch();
    }

    /// Drop the rule and restore the colour configuration saved when it was armed.
    pub fn cancel_threshold(&mut self) {
        if !self.threshold_panel.is_armed() {
            return;
        }
        self.threshold_panel.clear();
        self.image_panel.unlock();
        self.touch();
    }

    /// Replace the threshold state wholesale (panel paste).
    pub fn set_threshold_config(&mut self, config: Option<ThresholdRule>) {
        match config {
            Some(rule) => {
                self.image_panel.lock_for_threshold();
                self.threshold_panel.set_config(Some(rule));
                self.touch();
            }
            None => self.cancel_threshold(),
        }
    }

    /// New dock over the same buffer, carrying this dock's frame and cursor.
    pub(crate) fn duplicate_as(&self, instance: usize, cmap: Colormap) -> ArrayDock {
        let mut dock =
            ArrayDock::with_colormap(self.stack.clone(), self.title.clone(), instance, self.origin, cmap);
        dock.set_frame(self.frame);
        dock.sync_cursor(self.cursor);
        dock
    }
}
