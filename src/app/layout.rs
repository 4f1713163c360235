//! Layout management for ViewerApp.
//!
//! Original docks start side by side with equal widths, the operations form
//! below them. Duplicates and derived docks join the focused leaf as extra
//! tabs.

use egui_dock::{DockState, NodeIndex};
use log::debug;

use super::{DockTab, ViewerApp};
use crate::entities::dock::DockId;
use crate::entities::session::Session;

impl ViewerApp {
    /// Dock state with one column per registered dock above the
    /// operations strip. New tabs go to the first column.
    pub fn build_dock_state(session: &Session) -> DockState<DockTab> {
        let tabs: Vec<DockTab> = session.dock_ids().into_iter().map(DockTab::Array).collect();
        let Some((first, rest)) = tabs.split_first() else {
            return DockState::new(vec![DockTab::Operations]);
        };

        let mut dock_state = DockState::new(vec![*first]);
        let [mut node, _operations] = dock_state.main_surface_mut().split_below(
            NodeIndex::root(),
            0.8,
            vec![DockTab::Operations],
        );
        let count = tabs.len();
        for (i, tab) in rest.iter().enumerate() {
            // Left part keeps 1/remaining of what is left, so columns end up equal.
            let fraction = 1.0 / (count - i) as f32;
            let [_left, right] = dock_state.main_surface_mut().split_right(node, fraction, vec![*tab]);
            node = right;
        }

        if let Some((surface, leaf, _)) = dock_state.find_tab(first) {
            dock_state.set_focused_node_and_surface((surface, leaf));
        }
        dock_state
    }

    pub fn has_tab(&self, tab: DockTab) -> bool {
        self.dock_state.iter_all_tabs().any(|(_, t)| *t == tab)
    }

    /// Show a newly created dock.
    pub fn add_array_tab(&mut self, id: DockId) {
        let tab = DockTab::Array(id);
        if self.has_tab(tab) {
            return;
        }
        self.dock_state.push_to_focused_leaf(tab);
        debug!("Tab added for dock {}", id);
    }

    /// Drop the tab and GPU texture of a closed dock.
    pub fn remove_array_tab(&mut self, id: DockId) {
        self.dock_state.retain_tabs(|tab| *tab != DockTab::Array(id));
        self.textures.remove(&id);
        debug!("Tab removed for dock {}", id);
    }

    pub fn set_operations_visible(&mut self, visible: bool) {
        match (visible, self.has_tab(DockTab::Operations)) {
            (true, false) => self.dock_state.push_to_focused_leaf(DockTab::Operations),
            (false, true) => self.dock_state.retain_tabs(|tab| *tab != DockTab::Operations),
            _ => {}
        }
    }
}
