//! Explicit application state shared by every dock.
//!
//! A `Session` owns the registered docks (in creation order), the shape every
//! stack must have, the shared cursor, view synchronization and the panel
//! clipboard. Nothing in here touches the GUI; the app drives it through
//! events and reads it back to draw.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, warn};
use ndarray::ArrayD;

use crate::core::cursor::{CursorPosition, CursorSync};
use crate::core::view_sync::{ViewSync, ViewTransform};
use crate::entities::colormap::Colormap;
use crate::entities::dock::{ArrayDock, DockId, DockOrigin};
use crate::entities::operation::BinaryOp;
use crate::entities::panels::{DockPanel, PanelConfig, PanelKind};
use crate::entities::stack::{Stack, StackShape};
use crate::error::{Result, ViewerError};

#[derive(Debug, Default)]
pub struct Session {
    shape: Option<StackShape>,
    docks: IndexMap<DockId, ArrayDock>,
    cursor: CursorSync,
    view_sync: ViewSync,
    clipboard: HashMap<PanelKind, PanelConfig>,
    frame: usize,
    default_cmap: Colormap,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `arrays` as original docks, in order. Fails before anything
    /// is registered if the counts differ or nothing was given.
    pub fn with_arrays(arrays: Vec<ArrayD<f32>>, titles: Vec<String>) -> Result<Self> {
        Self::check_arrays(&arrays, &titles)?;
        let mut session = Self::new();
        for (array, title) in arrays.into_iter().zip(titles) {
            session.register_array(array, title)?;
        }
        info!(
            "Session ready: {} array(s) of shape {}",
            session.docks.len(),
            session.shape.map(|s| s.to_string()).unwrap_or_default()
        );
        Ok(session)
    }

    /// Everything [`Session::with_arrays`] would reject, checked on borrowed
    /// arrays. Returns the common shape.
    pub fn check_arrays(arrays: &[ArrayD<f32>], titles: &[String]) -> Result<StackShape> {
        if arrays.len() != titles.len() {
            return Err(ViewerError::TitleCountMismatch {
                arrays: arrays.len(),
                titles: titles.len(),
            });
        }
        let Some((first, rest)) = arrays.split_first() else {
            return Err(ViewerError::EmptyInput);
        };
        let expected = StackShape::of(first)?;
        for array in rest {
            let found = StackShape::of(array)?;
            if found != expected {
                return Err(ViewerError::ShapeMismatch { expected, found });
            }
        }
        Ok(expected)
    }

    /// Colormap given to docks created from now on.
    pub fn set_default_colormap(&mut self, cmap: Colormap) {
        self.default_cmap = cmap;
    }

    pub fn default_colormap(&self) -> Colormap {
        self.default_cmap
    }

    // === Registration ===

    /// Register an original array. It must be 3-D and match the session shape.
    pub fn register_array(&mut self, array: ArrayD<f32>, title: impl Into<String>) -> Result<DockId> {
        let stack = Stack::new(array)?;
        self.add_stack(stack, title, DockOrigin::Original)
    }

    /// Register a stack under `title`. The first stack fixes the session
    /// shape; a later one with a different shape is rejected.
    pub fn add_stack(&mut self, stack: Stack, title: impl Into<String>, origin: DockOrigin) -> Result<DockId> {
        let found = stack.shape();
        match self.shape {
            Some(expected) if expected != found => {
                warn!("Rejected stack of shape {} (session shape {})", found, expected);
                return Err(ViewerError::ShapeMismatch { expected, found });
            }
            Some(_) => {}
            None => self.shape = Some(found),
        }

        let title = title.into();
        let instance = self.next_instance(&title);
        let dock = ArrayDock::with_colormap(stack, title, instance, origin, self.default_cmap);
        Ok(self.insert(dock))
    }

    fn insert(&mut self, mut dock: ArrayDock) -> DockId {
        dock.set_frame(self.frame);
        dock.sync_cursor(self.cursor.position());
        let id = dock.id();
        debug!("Dock '{}' registered ({})", dock.display_title(), id);
        self.docks.insert(id, dock);
        id
    }

    /// Smallest positive instance number not held by a live dock titled `title`.
    fn next_instance(&self, title: &str) -> usize {
        let mut used: Vec<usize> = self
            .docks
            .values()
            .filter(|d| d.title() == title)
            .map(|d| d.instance())
            .collect();
        used.sort_unstable();
        let mut next = 1;
        for n in used {
            if n == next {
                next += 1;
            } else if n > next {
                break;
            }
        }
        next
    }

    /// Number of live docks (all instances) sharing `title`.
    pub fn live_instances(&self, title: &str) -> usize {
        self.docks.values().filter(|d| d.title() == title).count()
    }

    // === Lookup ===

    pub fn shape(&self) -> Option<StackShape> {
        self.shape
    }

    pub fn num_frames(&self) -> usize {
        self.shape.map(|s| s.frames).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.docks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docks.is_empty()
    }

    pub fn dock(&self, id: DockId) -> Result<&ArrayDock> {
        self.docks.get(&id).ok_or(ViewerError::UnknownDock(id.uuid()))
    }

    pub fn dock_mut(&mut self, id: DockId) -> Result<&mut ArrayDock> {
        self.docks.get_mut(&id).ok_or(ViewerError::UnknownDock(id.uuid()))
    }

    pub fn docks(&self) -> impl Iterator<Item = &ArrayDock> {
        self.docks.values()
    }

    pub fn dock_ids(&self) -> Vec<DockId> {
        self.docks.keys().copied().collect()
    }

    /// Docks usable as operands: not copies and not derived.
    pub fn original_docks(&self) -> impl Iterator<Item = &ArrayDock> {
        self.docks.values().filter(|d| d.is_original())
    }

    pub fn original_by_title(&self, title: &str) -> Result<&ArrayDock> {
        self.original_docks()
            .find(|d| d.title() == title)
            .ok_or_else(|| ViewerError::UnknownTitle(title.to_string()))
    }

    /// Titles offered for operand A.
    pub fn operand_titles(&self) -> Vec<String> {
        self.original_docks().map(|d| d.title().to_string()).collect()
    }

    /// Titles offered for operand B once A is chosen.
    pub fn operand_b_choices(&self, a_title: &str) -> Vec<String> {
        self.original_docks()
            .map(|d| d.title())
            .filter(|t| *t != a_title)
            .map(str::to_string)
            .collect()
    }

    // === Dock lifecycle ===

    /// New dock over the same buffer as `id`, with the next free instance number.
    pub fn duplicate_dock(&mut self, id: DockId) -> Result<DockId> {
        let source = self.dock(id)?;
        if !source.can_duplicate() {
            return Err(ViewerError::NotDuplicable(source.display_title()));
        }
        let instance = self.next_instance(source.title());
        let copy = source.duplicate_as(instance, self.default_cmap);
        info!("Duplicated '{}' as '{}'", source.display_title(), copy.display_title());
        Ok(self.insert(copy))
    }

    /// Remove a copy or derived dock. Originals stay for the whole session.
    pub fn close_dock(&mut self, id: DockId) -> Result<ArrayDock> {
        let dock = self.dock(id)?;
        if !dock.is_closable() {
            return Err(ViewerError::NotClosable(dock.display_title()));
        }
        let dock = self
            .docks
            .shift_remove(&id)
            .ok_or(ViewerError::UnknownDock(id.uuid()))?;
        info!("Closed '{}'", dock.display_title());
        Ok(dock)
    }

    /// Evaluate `op` over two original docks and register the result as a
    /// derived dock titled `"A <op> B"`.
    pub fn create_derived(&mut self, op: BinaryOp, a_title: &str, b_title: &str) -> Result<DockId> {
        let a = self.original_by_title(a_title)?.stack().clone();
        let b = self.original_by_title(b_title)?.stack().clone();
        let result = op.evaluate(a_title, &a, b_title, &b)?;
        let title = op.derived_title(a_title, b_title);
        info!("Derived '{}'", title);
        self.add_stack(result, title, DockOrigin::Derived)
    }

    // === Frame / cursor broadcast ===

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Show frame `frame` (clamped) in every dock.
    pub fn set_frame(&mut self, frame: usize) -> usize {
        self.frame = frame.min(self.num_frames().saturating_sub(1));
        for dock in self.docks.values_mut() {
            dock.set_frame(self.frame);
        }
        self.frame
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor.position()
    }

    /// A pointer moved over `source` at image coordinates `(x, y)`: snap it
    /// with that dock's shape and mirror it everywhere.
    pub fn pointer_moved(&mut self, source: DockId, x: f64, y: f64) -> Result<CursorPosition> {
        let shape = self.dock(source)?.shape();
        let position = self.cursor.move_to(x, y, shape);
        self.broadcast_cursor(position);
        Ok(position)
    }

    pub fn broadcast_cursor(&mut self, position: CursorPosition) {
        self.cursor.set_position(position);
        for dock in self.docks.values_mut() {
            dock.sync_cursor(position);
        }
    }

    pub fn crosshair_visible(&self) -> bool {
        self.cursor.is_visible()
    }

    pub fn set_crosshair_visible(&mut self, visible: bool) {
        self.cursor.set_visible(visible);
    }

    // === View sync ===

    pub fn view_sync_enabled(&self) -> bool {
        self.view_sync.is_enabled()
    }

    pub fn set_view_sync(&mut self, enabled: bool) {
        debug!("View sync {}", if enabled { "on" } else { "off" });
        self.view_sync.set_enabled(enabled);
    }

    /// `source` was panned or zoomed by the user; copy its view to the others.
    pub fn propagate_view(&mut self, source: DockId, transform: ViewTransform) -> usize {
        let targets = self.docks.iter_mut().map(|(id, d)| (*id, &mut d.viewport));
        self.view_sync.propagate(source, transform, targets)
    }

    /// User pan/zoom on `source`: apply it there, then copy it to the other
    /// docks when sync is on. Returns how many other docks followed.
    pub fn change_view(&mut self, source: DockId, transform: ViewTransform) -> Result<usize> {
        self.dock_mut(source)?.viewport.apply_transform(transform);
        Ok(self.propagate_view(source, transform))
    }

    /// Re-fit one dock. Never propagated.
    pub fn reset_view(&mut self, id: DockId) -> Result<()> {
        self.dock_mut(id)?.viewport.reset();
        Ok(())
    }

    // === Panel clipboard ===

    pub fn copy_panel(&mut self, id: DockId, kind: PanelKind) -> Result<()> {
        let dock = self.dock(id)?;
        let config = match kind {
            PanelKind::ImageConfiguration => PanelConfig::Image(dock.image_panel().config()),
            PanelKind::Threshold => PanelConfig::Threshold(dock.threshold_panel().config()),
        };
        debug!("Copied {} panel of '{}'", kind.name(), dock.display_title());
        self.clipboard.insert(kind, config);
        Ok(())
    }

    pub fn has_clipboard(&self, kind: PanelKind) -> bool {
        self.clipboard.contains_key(&kind)
    }

    pub fn paste_panel(&mut self, id: DockId, kind: PanelKind) -> Result<()> {
        let config = self
            .clipboard
            .get(&kind)
            .cloned()
            .ok_or(ViewerError::EmptyClipboard(kind.name()))?;
        let dock = self.dock_mut(id)?;
        match config {
            PanelConfig::Image(config) => dock.set_image_config(config)?,
            PanelConfig::Threshold(rule) => dock.set_threshold_config(rule),
        }
        debug!("Pasted {} panel into '{}'", kind.name(), dock.display_title());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::panels::ImageConfig;
    use crate::entities::threshold::ThresholdOp;
    use ndarray::{Array3, IxDyn};

    fn array(fill: f32) -> ArrayD<f32> {
        Array3::from_elem((4, 3, 5), fill).into_dyn()
    }

    fn ramp() -> ArrayD<f32> {
        Array3::from_shape_fn((4, 3, 5), |(t, y, x)| (t * 100 + y * 10 + x) as f32).into_dyn()
    }

    fn two_arrays() -> Session {
        Session::with_arrays(vec![ramp(), array(2.0)], vec!["A".into(), "B".into()]).unwrap()
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Session::with_arrays(vec![array(1.0)], vec![]),
            Err(ViewerError::TitleCountMismatch { arrays: 1, titles: 0 })
        ));
        assert!(matches!(
            Session::with_arrays(vec![], vec![]),
            Err(ViewerError::EmptyInput)
        ));
        let flat = ArrayD::<f32>::zeros(IxDyn(&[3, 4]));
        assert!(matches!(
            Session::with_arrays(vec![flat], vec!["X".into()]),
            Err(ViewerError::NotThreeDimensional { ndim: 2, .. })
        ));
    }

    #[test]
    fn check_arrays_borrows_input() {
        let arrays = vec![ramp(), array(2.0)];
        let titles = vec!["A".to_string(), "B".to_string()];
        assert_eq!(Session::check_arrays(&arrays, &titles).unwrap(), StackShape::new(4, 3, 5));

        let wide = vec![ramp(), Array3::<f32>::zeros((4, 3, 6)).into_dyn()];
        assert!(matches!(
            Session::check_arrays(&wide, &titles),
            Err(ViewerError::ShapeMismatch { .. })
        ));
        // the arrays are still usable afterwards
        assert_eq!(Session::with_arrays(arrays, titles).unwrap().len(), 2);
    }

    #[test]
    fn first_array_fixes_shape() {
        let mut session = two_arrays();
        assert_eq!(session.shape(), Some(StackShape::new(4, 3, 5)));
        let other = Array3::<f32>::zeros((4, 3, 6)).into_dyn();
        let err = session.register_array(other, "C").unwrap_err();
        assert!(matches!(err, ViewerError::ShapeMismatch { .. }));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn bad_dimensionality_never_fixes_shape() {
        let mut session = Session::new();
        assert!(session.register_array(ArrayD::zeros(IxDyn(&[2])), "X").is_err());
        assert_eq!(session.shape(), None);
        session.register_array(array(0.0), "A").unwrap();
        assert_eq!(session.shape(), Some(StackShape::new(4, 3, 5)));
    }

    #[test]
    fn duplicate_and_close_reuse_free_instances() {
        let mut session = two_arrays();
        let a = session.original_by_title("A").unwrap().id();

        let c2 = session.duplicate_dock(a).unwrap();
        let c3 = session.duplicate_dock(a).unwrap();
        assert_eq!(session.dock(c2).unwrap().display_title(), "A (2)");
        assert_eq!(session.dock(c3).unwrap().display_title(), "A (3)");
        assert!(session.dock(c2).unwrap().stack().shares_buffer_with(session.dock(a).unwrap().stack()));

        assert!(matches!(session.duplicate_dock(c2), Err(ViewerError::NotDuplicable(_))));
        assert!(matches!(session.close_dock(a), Err(ViewerError::NotClosable(_))));

        session.close_dock(c2).unwrap();
        assert_eq!(session.live_instances("A"), 2);
        let again = session.duplicate_dock(a).unwrap();
        assert_eq!(session.dock(again).unwrap().instance(), 2);
        assert_eq!(session.dock(c3).unwrap().instance(), 3);
    }

    #[test]
    fn new_docks_join_current_frame_and_cursor() {
        let mut session = two_arrays();
        session.set_frame(2);
        let a = session.original_by_title("A").unwrap().id();
        session.pointer_moved(a, 3.2, 1.9).unwrap();

        let copy = session.duplicate_dock(a).unwrap();
        let dock = session.dock(copy).unwrap();
        assert_eq!(dock.frame(), 2);
        assert_eq!(dock.readout().value, 213.0);
    }

    #[test]
    fn cursor_broadcast_reaches_every_dock() {
        let mut session = two_arrays();
        let a = session.original_by_title("A").unwrap().id();
        let b = session.original_by_title("B").unwrap().id();
        // B is constant 2.0, so its median cutoff is 2.0
        session.dock_mut(b).unwrap().arm_threshold(ThresholdOp::GreaterOrEqual);

        let pos = session.pointer_moved(a, 99.0, -3.0).unwrap();
        assert_eq!(pos, CursorPosition::new(4.5, 0.5));
        assert_eq!(session.dock(a).unwrap().readout().value, 4.0);
        assert_eq!(session.dock(b).unwrap().readout().value, 1.0);

        session.set_frame(10);
        assert_eq!(session.frame(), 3);
        assert_eq!(session.dock(a).unwrap().readout().value, 304.0);
    }

    #[test]
    fn operand_choices_exclude_copies_and_derived() {
        let mut session = two_arrays();
        let a = session.original_by_title("A").unwrap().id();
        session.duplicate_dock(a).unwrap();
        session.create_derived(BinaryOp::Sum, "A", "B").unwrap();

        assert_eq!(session.operand_titles(), vec!["A", "B"]);
        assert_eq!(session.operand_b_choices("A"), vec!["B"]);
        assert!(matches!(
            session.create_derived(BinaryOp::Sum, "A + B", "A"),
            Err(ViewerError::UnknownTitle(_))
        ));
    }

    #[test]
    fn derived_docks() {
        let mut session = two_arrays();
        let id = session.create_derived(BinaryOp::Difference, "A", "B").unwrap();
        let dock = session.dock(id).unwrap();
        assert_eq!(dock.display_title(), "A - B");
        assert!(dock.is_derived());
        assert_eq!(dock.stack().value_at(1, 0, 0), 98.0);

        // A has a zero at (0, 0, 0), so B / A divides by zero
        let before = session.len();
        let err = session.create_derived(BinaryOp::Division, "B", "A").unwrap_err();
        assert!(matches!(err, ViewerError::NonFiniteResult { .. }));
        assert_eq!(session.len(), before);

        let copy = session.duplicate_dock(id).unwrap();
        assert_eq!(session.dock(copy).unwrap().display_title(), "A - B (2)");
        assert!(session.dock(copy).unwrap().is_derived());
        session.close_dock(id).unwrap();
    }

    #[test]
    fn view_sync_propagates_to_others_only() {
        let mut session = two_arrays();
        let ids = session.dock_ids();
        let transform = ViewTransform {
            zoom: 2.5,
            pan: [4.0, 1.0],
        };
        assert_eq!(session.propagate_view(ids[0], transform), 0);

        session.set_view_sync(true);
        assert_eq!(session.propagate_view(ids[0], transform), 1);
        assert_eq!(session.dock(ids[1]).unwrap().viewport.transform(), transform);
        assert_ne!(session.dock(ids[0]).unwrap().viewport.transform(), transform);

        session.reset_view(ids[1]).unwrap();
        assert_eq!(session.dock(ids[1]).unwrap().viewport.pan, eframe::egui::Vec2::ZERO);
    }

    #[test]
    fn change_view_moves_source_first() {
        let mut session = two_arrays();
        let ids = session.dock_ids();
        let transform = ViewTransform {
            zoom: 1.5,
            pan: [-2.0, 3.0],
        };
        assert_eq!(session.change_view(ids[0], transform).unwrap(), 0);
        assert_eq!(session.dock(ids[0]).unwrap().viewport.transform(), transform);
        assert_ne!(session.dock(ids[1]).unwrap().viewport.transform(), transform);

        session.set_view_sync(true);
        assert_eq!(session.change_view(ids[0], transform).unwrap(), 1);
        assert_eq!(session.dock(ids[1]).unwrap().viewport.transform(), transform);

        assert!(session.change_view(DockId::new(), transform).is_err());
    }

    #[test]
    fn panel_copy_paste() {
        let mut session = two_arrays();
        let ids = session.dock_ids();
        assert!(matches!(
            session.paste_panel(ids[1], PanelKind::ImageConfiguration),
            Err(ViewerError::EmptyClipboard(_))
        ));

        session
            .dock_mut(ids[0])
            .unwrap()
            .set_colormap(Colormap::Inferno)
            .unwrap();
        session.copy_panel(ids[0], PanelKind::ImageConfiguration).unwrap();
        session.paste_panel(ids[1], PanelKind::ImageConfiguration).unwrap();
        assert_eq!(session.dock(ids[1]).unwrap().image_config().cmap, Colormap::Inferno);

        session.dock_mut(ids[0]).unwrap().arm_threshold(ThresholdOp::Less);
        session.copy_panel(ids[0], PanelKind::Threshold).unwrap();
        session.paste_panel(ids[1], PanelKind::Threshold).unwrap();
        assert_eq!(
            session.dock(ids[1]).unwrap().image_config(),
            ImageConfig::THRESHOLD_DISPLAY
        );
        // image config cannot be pasted over an armed threshold
        assert!(matches!(
            session.paste_panel(ids[1], PanelKind::ImageConfiguration),
            Err(ViewerError::ThresholdActive(_))
        ));
    }
}
