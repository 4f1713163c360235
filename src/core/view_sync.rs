//! Pan/zoom synchronization between docks.
//!
//! When enabled, a user pan/zoom in one dock is copied to every other dock.
//! A single in-progress flag guards against feedback loops: a propagation
//! requested while another one is being applied is dropped. Receiving docks
//! apply the transform silently, so they never emit a change of their own.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::entities::dock::DockId;
use crate::widgets::viewport::ViewportState;

/// Zoom + pan snapshot of one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: [f32; 2],
}

#[derive(Debug, Default, Clone)]
pub struct ViewSync {
    enabled: bool,
    in_progress: bool,
}

impl ViewSync {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            in_progress: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_propagating(&self) -> bool {
        self.in_progress
    }

    /// Copy `transform` from `source` to every other target viewport.
    /// Returns how many viewports were updated.
    pub fn propagate<'a, I>(&mut self, source: DockId, transform: ViewTransform, targets: I) -> usize
    where
        I: IntoIterator<Item = (DockId, &'a mut ViewportState)>,
    {
        if !self.enabled || self.in_progress {
            return 0;
        }
        self.in_progress = true;

        let mut updated = 0;
        for (id, viewport) in targets {
            if id == source {
                continue;
            }
            viewport.apply_transform(transform);
            updated += 1;
        }

        self.in_progress = false;
        trace!("View sync from {}: {} viewport(s) updated", source, updated);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> ViewTransform {
        ViewTransform {
            zoom: 3.0,
            pan: [5.0, -2.0],
        }
    }

    #[test]
    fn disabled_sync_does_nothing() {
        let mut sync = ViewSync::new(false);
        let mut vp = ViewportState::new(4, 4);
        let n = sync.propagate(DockId::new(), transform(), [(DockId::new(), &mut vp)]);
        assert_eq!(n, 0);
        assert_eq!(vp.zoom, 1.0);
    }

    #[test]
    fn skips_source_and_updates_others() {
        let mut sync = ViewSync::new(true);
        let source = DockId::new();
        let mut own = ViewportState::new(4, 4);
        let mut other = ViewportState::new(4, 4);
        let n = sync.propagate(
            source,
            transform(),
            [(source, &mut own), (DockId::new(), &mut other)],
        );
        assert_eq!(n, 1);
        assert_eq!(own.zoom, 1.0);
        assert_eq!(other.transform(), transform());
        assert!(!sync.is_propagating());
    }

    #[test]
    fn reentrant_requests_are_ignored() {
        let mut sync = ViewSync::new(true);
        sync.in_progress = true;
        let mut vp = ViewportState::new(4, 4);
        let n = sync.propagate(DockId::new(), transform(), [(DockId::new(), &mut vp)]);
        assert_eq!(n, 0);
        assert_eq!(vp.zoom, 1.0);
    }
}
