//! Per-dock configuration panels.
//!
//! Every dock carries an image configuration panel (colormap and colour
//! range) and a threshold panel. Panels expose their state as a plain config
//! value so it can be copied from one dock and pasted into another.

use serde::{Deserialize, Serialize};

use crate::entities::colormap::Colormap;
use crate::entities::stack::Stack;
use crate::entities::threshold::{ThresholdOp, ThresholdRule};

/// A panel with a copyable configuration.
pub trait DockPanel {
    type Config: Clone;

    const KIND: PanelKind;

    fn config(&self) -> Self::Config;

    fn set_config(&mut self, config: Self::Config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    ImageConfiguration,
    Threshold,
}

impl PanelKind {
    pub fn name(self) -> &'static str {
        match self {
            PanelKind::ImageConfiguration => "Image Configuration",
            PanelKind::Threshold => "Threshold",
        }
    }
}

/// Clipboard payload for panel copy/paste.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelConfig {
    Image(ImageConfig),
    Threshold(Option<ThresholdRule>),
}

impl PanelConfig {
    pub fn kind(&self) -> PanelKind {
        match self {
            PanelConfig::Image(_) => PanelKind::ImageConfiguration,
            PanelConfig::Threshold(_) => PanelKind::Threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub cmap: Colormap,
    pub vmin: f32,
    pub vmax: f32,
}

impl ImageConfig {
    /// Configuration forced while a threshold rule is displayed.
    pub const THRESHOLD_DISPLAY: ImageConfig = ImageConfig {
        cmap: Colormap::Gray,
        vmin: 0.0,
        vmax: 1.0,
    };

    /// Normalize a value into `[0, 1]` for colormap lookup (NaN passes through).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.vmax - self.vmin;
        if span > 0.0 {
            (value - self.vmin) / span
        } else if value.is_nan() {
            value
        } else if value >= self.vmax {
            1.0
        } else {
            0.0
        }
    }

    #[inline]
    pub fn colour(&self, value: f32) -> [u8; 4] {
        self.cmap.apply(self.normalize(value))
    }
}

/// Colormap + colour range controls of one dock.
#[derive(Debug, Clone)]
pub struct ImageConfigPanel {
    config: ImageConfig,
    data_min: f32,
    data_max: f32,
    step: f32,
    /// Configuration saved while a threshold rule overrides the display.
    cached: Option<ImageConfig>,
}

impl ImageConfigPanel {
    pub fn new(stack: &Stack, cmap: Colormap) -> Self {
        let stats = stack.stats();
        Self {
            config: ImageConfig {
                cmap,
                vmin: stats.p1,
                vmax: stats.p99,
            },
            data_min: stats.min,
            data_max: stats.max,
            step: stack.step_size(),
            cached: None,
        }
    }

    pub fn data_range(&self) -> (f32, f32) {
        (self.data_min, self.data_max)
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// False while a threshold rule is armed.
    pub fn is_enabled(&self) -> bool {
        self.cached.is_none()
    }

    pub fn set_cmap(&mut self, cmap: Colormap) {
        self.config.cmap = cmap;
    }

    /// Set the lower bound, kept within the data range and below `vmax`.
    pub fn set_vmin(&mut self, vmin: f32) {
        let upper = self.config.vmax.max(self.data_min);
        self.config.vmin = vmin.clamp(self.data_min, upper);
    }

    /// Set the upper bound, kept within the data range and above `vmin`.
    pub fn set_vmax(&mut self, vmax: f32) {
        let lower = self.config.vmin.min(self.data_max);
        self.config.vmax = vmax.clamp(lower, self.data_max);
    }

    /// Stretch the colour range over the full data range, keeping the colormap.
    pub fn reset_to_data_range(&mut self) {
        self.config.vmin = self.data_min;
        self.config.vmax = self.data_max;
    }

    /// Save the current configuration and switch to the threshold display.
    /// Locking twice keeps the first saved configuration.
    pub fn lock_for_threshold(&mut self) {
        if self.cached.is_none() {
            self.cached = Some(self.config);
        }
        self.config = ImageConfig::THRESHOLD_DISPLAY;
    }

    /// Restore the configuration saved by [`lock_for_threshold`](Self::lock_for_threshold).
    pub fn unlock(&mut self) {
        if let Some(saved) = self.cached.take() {
            self.config = saved;
        }
    }
}

impl DockPanel for ImageConfigPanel {
    type Config = ImageConfig;

    const KIND: PanelKind = PanelKind::ImageConfiguration;

    fn config(&self) -> ImageConfig {
        self.config
    }

    fn set_config(&mut self, config: ImageConfig) {
        let clamp = |v: f32| v.clamp(self.data_min, self.data_max);
        let (lo, hi) = (clamp(config.vmin), clamp(config.vmax));
        self.config = ImageConfig {
            cmap: config.cmap,
            vmin: lo.min(hi),
            vmax: lo.max(hi),
        };
    }
}

/// Threshold rule selection and cutoff control of one dock.
#[derive(Debug, Clone)]
pub struct ThresholdPanel {
    op: Option<ThresholdOp>,
    cutoff: f32,
    cutoff_min: f32,
    cutoff_max: f32,
    step: f32,
}

impl ThresholdPanel {
    pub fn new(stack: &Stack) -> Self {
        let stats = stack.stats();
        Self {
            op: None,
            cutoff: stats.p50,
            cutoff_min: stats.min,
            cutoff_max: stats.max,
            step: stack.step_size(),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.op.is_some()
    }

    pub fn rule(&self) -> Option<ThresholdRule> {
        self.op.map(|op| ThresholdRule::new(op, self.cutoff))
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn cutoff_range(&self) -> (f32, f32) {
        (self.cutoff_min, self.cutoff_max)
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn arm(&mut self, op: ThresholdOp) -> ThresholdRule {
        self.op = Some(op);
        ThresholdRule::new(op, self.cutoff)
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff.clamp(self.cutoff_min, self.cutoff_max);
    }

    pub fn clear(&mut self) {
        self.op = None;
    }
}

impl DockPanel for ThresholdPanel {
    type Config = Option<ThresholdRule>;

    const KIND: PanelKind = PanelKind::Threshold;

    fn config(&self) -> Option<ThresholdRule> {
        self.rule()
    }

    fn set_config(&mut self, config: Option<ThresholdRule>) {
        match config {
            Some(rule) => {
                self.set_cutoff(rule.cutoff);
                self.op = Some(rule.op);
            }
            None => self.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn ramp_stack() -> Stack {
        // values 0..=100 in a single frame
        let data = Array3::from_shape_fn((1, 1, 101), |(_, _, x)| x as f32);
        Stack::from(data)
    }

    #[test]
    fn defaults_use_percentiles() {
        let panel = ImageConfigPanel::new(&ramp_stack(), Colormap::Gray);
        let config = panel.config();
        assert_eq!(config.vmin, 1.0);
        assert_eq!(config.vmax, 99.0);
        assert_eq!(panel.data_range(), (0.0, 100.0));
        assert_eq!(panel.step(), 1.0);
    }

    #[test]
    fn vmin_vmax_stay_ordered() {
        let mut panel = ImageConfigPanel::new(&ramp_stack(), Colormap::Gray);
        panel.set_vmin(150.0);
        assert_eq!(panel.config().vmin, 99.0);
        panel.set_vmax(-5.0);
        assert_eq!(panel.config().vmax, 99.0);
        panel.set_vmin(-10.0);
        assert_eq!(panel.config().vmin, 0.0);
    }

    #[test]
    fn reset_keeps_colormap() {
        let mut panel = ImageConfigPanel::new(&ramp_stack(), Colormap::Magma);
        panel.reset_to_data_range();
        assert_eq!(
            panel.config(),
            ImageConfig {
                cmap: Colormap::Magma,
                vmin: 0.0,
                vmax: 100.0
            }
        );
    }

    #[test]
    fn lock_and_unlock_restore_exactly() {
        let mut panel = ImageConfigPanel::new(&ramp_stack(), Colormap::Viridis);
        panel.set_vmin(12.5);
        let before = panel.config();

        panel.lock_for_threshold();
        assert!(!panel.is_enabled());
        assert_eq!(panel.config(), ImageConfig::THRESHOLD_DISPLAY);

        // switching operator while locked must not overwrite the saved config
        panel.lock_for_threshold();
        panel.unlock();
        assert!(panel.is_enabled());
        assert_eq!(panel.config(), before);
    }

    #[test]
    fn pasted_config_is_clamped_and_ordered() {
        let mut panel = ImageConfigPanel::new(&ramp_stack(), Colormap::Gray);
        panel.set_config(ImageConfig {
            cmap: Colormap::Plasma,
            vmin: 500.0,
            vmax: 20.0,
        });
        let config = panel.config();
        assert_eq!(config.cmap, Colormap::Plasma);
        assert_eq!((config.vmin, config.vmax), (20.0, 100.0));
    }

    #[test]
    fn normalize_handles_degenerate_range() {
        let flat = ImageConfig {
            cmap: Colormap::Gray,
            vmin: 2.0,
            vmax: 2.0,
        };
        assert_eq!(flat.normalize(1.0), 0.0);
        assert_eq!(flat.normalize(2.0), 1.0);
        assert!(flat.normalize(f32::NAN).is_nan());
        assert_eq!(ImageConfig::THRESHOLD_DISPLAY.normalize(0.5), 0.5);
    }

    #[test]
    fn threshold_panel_defaults_to_median() {
        let mut panel = ThresholdPanel::new(&ramp_stack());
        assert!(!panel.is_armed());
        assert_eq!(panel.cutoff(), 50.0);
        let rule = panel.arm(ThresholdOp::Less);
        assert_eq!(rule, ThresholdRule::new(ThresholdOp::Less, 50.0));
        panel.set_cutoff(1000.0);
        assert_eq!(panel.rule().unwrap().cutoff, 100.0);
        panel.clear();
        assert_eq!(panel.config(), None);
    }

    #[test]
    fn threshold_config_round_trips_between_panels() {
        let mut source = ThresholdPanel::new(&ramp_stack());
        source.arm(ThresholdOp::Equal);
        source.set_cutoff(7.0);

        let mut target = ThresholdPanel::new(&ramp_stack());
        target.set_config(source.config());
        assert_eq!(target.rule(), Some(ThresholdRule::new(ThresholdOp::Equal, 7.0)));

        target.set_config(None);
        assert!(!target.is_armed());
    }
}
