//! Ordered click store.
//!
//! The store owns the list of recorded clicks.  Insertion order is playback
//! order, and every flag change goes through the store so the aggregate
//! queries (`count_enabled`, `all_enabled`, ...) are always consistent with
//! the list: they are recomputed on each call, never cached.
//!
//! # Bulk toggles (for beginners)
//!
//! The UI has a single "Toggle Enabled" button whose scope depends on the
//! selection:
//!
//! - **Something is selected** – every selected click flips its own
//!   `is_enabled` flag.  Unselected clicks are never touched.
//! - **Nothing is selected** – the whole list is switched to one shared
//!   value.  The store remembers the last value it applied, so repeated
//!   presses cycle the entire list between all-disabled and all-enabled
//!   instead of flipping each click independently.
//!
//! "Toggle Selected" follows the same alternating pattern over `is_selected`
//! but always applies to every click.

use thiserror::Error;

use super::click::{ClickId, SavedClick};

/// Errors returned by store mutations that address a click by id.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No click with this id exists in the store.
    #[error("click not found: {0}")]
    UnknownClick(ClickId),
}

/// Tri-state summary of one boolean flag across the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Every click has the flag set (and the list is non-empty).
    All,
    /// No click has the flag set.  An empty list is `None`.
    None,
    /// Some clicks have the flag set and some do not.
    Mixed,
}

impl Aggregate {
    fn from_counts(set: usize, total: usize) -> Self {
        if set == 0 {
            Aggregate::None
        } else if set == total {
            Aggregate::All
        } else {
            Aggregate::Mixed
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: ClickId,
    click: SavedClick,
}

/// The ordered, owned collection of recorded clicks.
#[derive(Debug, Clone)]
pub struct ClickStore {
    entries: Vec<Entry>,
    next_id: u64,
    /// Value most recently applied to every click by an unscoped enable toggle.
    last_all_enabled: bool,
    /// Value most recently applied to every click by the select toggle.
    last_all_selected: bool,
}

impl Default for ClickStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickStore {
    /// Creates an empty store.
    ///
    /// The alternating flags start from the state a freshly recorded list is
    /// in (all enabled, none selected), so the first unscoped enable toggle
    /// disables everything and the first select toggle selects everything.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            last_all_enabled: true,
            last_all_selected: false,
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Appends `click` to the end of the list and returns its new id.
    pub fn add(&mut self, click: SavedClick) -> ClickId {
        let id = ClickId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, click });
        id
    }

    /// Removes the click with `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClick`] if the id is not in the store.
    pub fn remove(&mut self, id: ClickId) -> Result<SavedClick, StoreError> {
        let index = self.index_of(id)?;
        Ok(self.entries.remove(index).click)
    }

    /// Removes every selected click and returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.click.is_selected);
        before - self.entries.len()
    }

    /// Removes all clicks.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the whole list with `clicks`, in order.
    ///
    /// Ids are freshly assigned; ids handed out before the call become unknown.
    pub fn replace_all<I>(&mut self, clicks: I)
    where
        I: IntoIterator<Item = SavedClick>,
    {
        self.entries.clear();
        for click in clicks {
            self.add(click);
        }
    }

    /// Sets the enabled flag of one click.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClick`] if the id is not in the store.
    pub fn set_enabled(&mut self, id: ClickId, enabled: bool) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        self.entries[index].click.is_enabled = enabled;
        Ok(())
    }

    /// Sets the selected flag of one click.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClick`] if the id is not in the store.
    pub fn set_selected(&mut self, id: ClickId, selected: bool) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        self.entries[index].click.is_selected = selected;
        Ok(())
    }

    /// Moves one click to new coordinates.  This is the only way coordinates
    /// change after a click is created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClick`] if the id is not in the store.
    pub fn set_position(&mut self, id: ClickId, x: i32, y: i32) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let click = &mut self.entries[index].click;
        click.x = x;
        click.y = y;
        Ok(())
    }

    /// Toggles `is_enabled`, scoped by the current selection.
    ///
    /// See the module docs for the exact tie-break rules.
    pub fn toggle_enabled_scope(&mut self) {
        if self.count_selected() > 0 {
            for entry in self.entries.iter_mut().filter(|e| e.click.is_selected) {
                entry.click.is_enabled = !entry.click.is_enabled;
            }
            return;
        }

        self.last_all_enabled = !self.last_all_enabled;
        let value = self.last_all_enabled;
        for entry in &mut self.entries {
            entry.click.is_enabled = value;
        }
    }

    /// Toggles `is_selected` on every click using the alternating select flag.
    pub fn toggle_selected_scope(&mut self) {
        self.last_all_selected = !self.last_all_selected;
        let value = self.last_all_selected;
        for entry in &mut self.entries {
            entry.click.is_selected = value;
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Returns the click with `id`, if present.
    pub fn get(&self, id: ClickId) -> Option<&SavedClick> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.click)
    }

    /// Returns the id of the click at list position `index`.
    pub fn id_at(&self, index: usize) -> Option<ClickId> {
        self.entries.get(index).map(|e| e.id)
    }

    /// Iterates over all clicks in list order.
    pub fn iter(&self) -> impl Iterator<Item = (ClickId, &SavedClick)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.click))
    }

    /// Returns a copy of the enabled subsequence, in list order.
    ///
    /// This is the playback order for one pass.  Returning owned values lets
    /// the playback loop release the store lock before injecting anything.
    pub fn enabled_clicks(&self) -> Vec<SavedClick> {
        self.entries
            .iter()
            .filter(|e| e.click.is_enabled)
            .map(|e| e.click)
            .collect()
    }

    /// Returns the coordinates of every click in list order.
    pub fn positions(&self) -> Vec<(i32, i32)> {
        self.entries.iter().map(|e| e.click.position()).collect()
    }

    /// Total number of clicks.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of clicks with `is_enabled == true`.
    pub fn count_enabled(&self) -> usize {
        self.entries.iter().filter(|e| e.click.is_enabled).count()
    }

    /// Number of clicks with `is_selected == true`.
    pub fn count_selected(&self) -> usize {
        self.entries.iter().filter(|e| e.click.is_selected).count()
    }

    /// Tri-state summary of the enabled flags.
    pub fn enabled_aggregate(&self) -> Aggregate {
        Aggregate::from_counts(self.count_enabled(), self.count())
    }

    /// Tri-state summary of the selected flags.
    pub fn selected_aggregate(&self) -> Aggregate {
        Aggregate::from_counts(self.count_selected(), self.count())
    }

    pub fn all_enabled(&self) -> bool {
        self.enabled_aggregate() == Aggregate::All
    }

    pub fn all_disabled(&self) -> bool {
        self.enabled_aggregate() == Aggregate::None
    }

    pub fn mixed_enabled(&self) -> bool {
        self.enabled_aggregate() == Aggregate::Mixed
    }

    pub fn all_selected(&self) -> bool {
        self.selected_aggregate() == Aggregate::All
    }

    pub fn none_selected(&self) -> bool {
        self.selected_aggregate() == Aggregate::None
    }

    pub fn mixed_selected(&self) -> bool {
        self.selected_aggregate() == Aggregate::Mixed
    }

    fn index_of(&self, id: ClickId) -> Result<usize, StoreError> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownClick(id))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: i32) -> (ClickStore, Vec<ClickId>) {
        let mut store = ClickStore::new();
        let ids = (0..n).map(|i| store.add(SavedClick::new(i * 10, i * 20))).collect();
        (store, ids)
    }

    // ── Add / remove ──────────────────────────────────────────────────────────

    #[test]
    fn test_add_preserves_insertion_order() {
        // Arrange / Act
        let (store, _) = store_with(3);

        // Assert
        assert_eq!(store.positions(), vec![(0, 0), (10, 20), (20, 40)]);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        // Arrange
        let (mut store, ids) = store_with(2);

        // Act
        store.remove(ids[1]).unwrap();
        let new_id = store.add(SavedClick::new(5, 5));

        // Assert
        assert_ne!(new_id, ids[1]);
    }

    #[test]
    fn test_remove_unknown_id_returns_error_and_keeps_list() {
        // Arrange
        let (mut store, ids) = store_with(2);
        store.remove(ids[0]).unwrap();

        // Act
        let result = store.remove(ids[0]);

        // Assert
        assert_eq!(result, Err(StoreError::UnknownClick(ids[0])));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_selected_removes_only_selected() {
        // Arrange
        let (mut store, ids) = store_with(4);
        store.set_selected(ids[1], true).unwrap();
        store.set_selected(ids[3], true).unwrap();

        // Act
        let removed = store.remove_selected();

        // Assert
        assert_eq!(removed, 2);
        assert_eq!(store.positions(), vec![(0, 0), (20, 40)]);
    }

    #[test]
    fn test_replace_all_assigns_fresh_ids() {
        let (mut store, ids) = store_with(2);

        store.replace_all(vec![SavedClick::new(1, 1)]);

        assert_eq!(store.count(), 1);
        assert!(store.get(ids[0]).is_none());
        assert_eq!(store.get(store.id_at(0).unwrap()).unwrap().position(), (1, 1));
    }

    #[test]
    fn test_set_position_moves_click() {
        let (mut store, ids) = store_with(1);

        store.set_position(ids[0], -5, 7).unwrap();

        assert_eq!(store.get(ids[0]).unwrap().position(), (-5, 7));
    }

    // ── Enabled subsequence ───────────────────────────────────────────────────

    #[test]
    fn test_enabled_clicks_preserves_relative_order() {
        // Arrange
        let (mut store, ids) = store_with(5);
        store.set_enabled(ids[1], false).unwrap();
        store.set_enabled(ids[3], false).unwrap();

        // Act
        let enabled: Vec<(i32, i32)> =
            store.enabled_clicks().iter().map(SavedClick::position).collect();

        // Assert
        assert_eq!(enabled, vec![(0, 0), (20, 40), (40, 80)]);
    }

    #[test]
    fn test_aggregates_track_mutations_immediately() {
        // Arrange
        let (mut store, ids) = store_with(2);
        assert!(store.all_enabled());

        // Act / Assert
        store.set_enabled(ids[0], false).unwrap();
        assert!(store.mixed_enabled());
        assert_eq!(store.count_enabled(), 1);

        store.remove(ids[1]).unwrap();
        assert!(store.all_disabled());
        assert_eq!(store.count_enabled(), 0);

        store.add(SavedClick::new(0, 0));
        assert!(store.mixed_enabled());
    }

    #[test]
    fn test_empty_store_aggregates() {
        let store = ClickStore::new();
        assert!(!store.all_enabled());
        assert!(store.all_disabled());
        assert!(!store.mixed_enabled());
        assert!(store.none_selected());
        assert!(!store.all_selected());
    }

    // ── Toggle enabled scope ──────────────────────────────────────────────────

    #[test]
    fn test_toggle_enabled_without_selection_alternates_whole_list() {
        for size in [1, 2, 7] {
            // Arrange
            let (mut store, _) = store_with(size);
            assert!(store.all_enabled());

            // Act / Assert
            store.toggle_enabled_scope();
            assert!(store.all_disabled(), "call 1 must disable all (size {size})");
            store.toggle_enabled_scope();
            assert!(store.all_enabled(), "call 2 must enable all (size {size})");
            store.toggle_enabled_scope();
            assert!(store.all_disabled(), "call 3 must disable all (size {size})");
        }
    }

    #[test]
    fn test_toggle_enabled_without_selection_uses_shared_flag_not_per_click() {
        // Arrange: a mixed list.  Flipping each click independently would keep
        // it mixed; the shared flag must force a uniform value.
        let (mut store, ids) = store_with(3);
        store.set_enabled(ids[0], false).unwrap();

        // Act
        store.toggle_enabled_scope();

        // Assert
        assert!(store.all_disabled());

        store.toggle_enabled_scope();
        assert!(store.all_enabled());
    }

    #[test]
    fn test_toggle_enabled_with_selection_flips_only_selected() {
        // Arrange
        let (mut store, ids) = store_with(4);
        store.set_enabled(ids[2], false).unwrap();
        store.set_selected(ids[0], true).unwrap();
        store.set_selected(ids[2], true).unwrap();

        // Act
        store.toggle_enabled_scope();

        // Assert – selected clicks flipped independently
        assert!(!store.get(ids[0]).unwrap().is_enabled);
        assert!(store.get(ids[2]).unwrap().is_enabled);
        // Unselected clicks untouched
        assert!(store.get(ids[1]).unwrap().is_enabled);
        assert!(store.get(ids[3]).unwrap().is_enabled);
    }

    #[test]
    fn test_scoped_toggle_does_not_advance_shared_flag() {
        // Arrange
        let (mut store, ids) = store_with(2);
        store.set_selected(ids[0], true).unwrap();
        store.toggle_enabled_scope();
        store.set_selected(ids[0], false).unwrap();

        // Act – first unscoped toggle still disables everything
        store.toggle_enabled_scope();

        // Assert
        assert!(store.all_disabled());
    }

    // ── Toggle selected scope ─────────────────────────────────────────────────

    #[test]
    fn test_toggle_selected_alternates_and_ignores_current_selection() {
        // Arrange
        let (mut store, ids) = store_with(3);
        store.set_selected(ids[1], true).unwrap();

        // Act / Assert
        store.toggle_selected_scope();
        assert!(store.all_selected());
        store.toggle_selected_scope();
        assert!(store.none_selected());
        assert_eq!(store.count_selected(), 0);
    }

    #[test]
    fn test_enabled_and_selected_flags_are_independent() {
        let (mut store, _) = store_with(2);

        store.toggle_selected_scope();

        assert!(store.all_selected());
        assert!(store.all_enabled());
    }
}
