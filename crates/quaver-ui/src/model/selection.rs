//! Row selection state for listing widgets.
//!
//! [`RowSelection`] tracks which logical rows of a listing are selected,
//! which row is *current* (drives keyboard movement), and the *anchor* row
//! used as the far end of a shift-range selection. It is pure state: the
//! owning widget decides when to call it and applies the visual selection
//! classes afterward.
//!
//! Rows are identified by logical row number (`i64`), not by display slot,
//! so the selection survives scrolling unchanged.

use std::collections::HashSet;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one row selected at any time (default).
    #[default]
    Single,
    /// Ctrl-toggle and shift-range multi-selection.
    Multiple,
}

/// Direction for keyboard selection movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward row 0.
    Previous,
    /// Toward the last row.
    Next,
    /// One page toward row 0.
    PageBackward,
    /// One page toward the last row.
    PageForward,
}

/// Selected-row set plus current/anchor bookkeeping.
///
/// The set iterates in selection (insertion) order; ascending and
/// descending row-order walks are available separately. A fresh selection
/// starts with row 0 selected, matching a listing that always shows a
/// selection when it has any rows.
#[derive(Debug, Clone)]
pub struct RowSelection {
    mode: SelectionMode,
    /// Selection order.
    order: Vec<i64>,
    /// Membership index for O(1) lookups.
    rows: HashSet<i64>,
    /// Last row that received a selection event.
    current: i64,
    /// Far end of the next shift-range selection.
    anchor: i64,
}

impl Default for RowSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSelection {
    /// Creates a selection with row 0 selected.
    pub fn new() -> Self {
        Self {
            mode: SelectionMode::default(),
            order: vec![0],
            rows: HashSet::from([0]),
            current: 0,
            anchor: 0,
        }
    }

    /// The active selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch selection modes.
    ///
    /// Dropping back to [`SelectionMode::Single`] keeps only the current
    /// row selected.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Single && self.count() > 1 {
            let keep = self.current;
            self.clear();
            self.add(keep);
        }
    }

    /// Whether a row is selected.
    pub fn is_selected(&self, rownum: i64) -> bool {
        self.rows.contains(&rownum)
    }

    /// Number of selected rows.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The current row, or `None` when nothing is selected.
    pub fn current(&self) -> Option<i64> {
        if self.order.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    /// The current row even when the set is empty (last known value).
    pub(crate) fn current_unchecked(&self) -> i64 {
        self.current
    }

    /// The shift-range anchor row.
    pub fn anchor(&self) -> i64 {
        self.anchor
    }

    /// Reposition the shift-range anchor.
    pub fn set_anchor(&mut self, rownum: i64) {
        self.anchor = rownum;
    }

    /// Selected rows in selection order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }

    /// Selected rows in ascending row order.
    pub fn rows_ascending(&self) -> Vec<i64> {
        let mut rows = self.order.clone();
        rows.sort_unstable();
        rows
    }

    /// Selected rows in descending row order.
    pub fn rows_descending(&self) -> Vec<i64> {
        let mut rows = self.rows_ascending();
        rows.reverse();
        rows
    }

    /// Add a row to the selection and make it current.
    ///
    /// Adding an already-selected row only moves `current`. In single mode
    /// this replaces the previous selection.
    pub fn add(&mut self, rownum: i64) {
        if self.mode == SelectionMode::Single && !self.is_selected(rownum) {
            self.clear();
        }
        if self.rows.insert(rownum) {
            self.order.push(rownum);
        }
        self.current = rownum;
    }

    /// Remove one row from the selection.
    ///
    /// When the removed row was current, `current` becomes the highest
    /// remaining selected row; an empty result leaves `current` untouched.
    pub fn remove(&mut self, rownum: i64) {
        if !self.rows.remove(&rownum) {
            return;
        }
        self.order.retain(|r| *r != rownum);
        if let Some(max) = self.order.iter().copied().max() {
            self.current = max;
        }
    }

    /// Deselect everything. `current` and `anchor` keep their last values.
    pub fn clear(&mut self) {
        self.order.clear();
        self.rows.clear();
    }

    /// Clear and select exactly one row.
    pub fn select_only(&mut self, rownum: i64) {
        self.clear();
        self.add(rownum);
        self.anchor = rownum;
    }

    /// Add every row in `[a, b]` (order of endpoints does not matter).
    pub fn add_range(&mut self, a: i64, b: i64) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        for rownum in min..=max {
            self.add(rownum);
        }
    }

    /// Apply the click selection rule.
    ///
    /// - plain click (or single mode): clear, select the row
    /// - shift held, multiple mode: select the anchor..row range
    /// - ctrl held, multiple mode: toggle the row
    ///
    /// Whenever the result is a single selected row, the anchor follows it.
    pub fn update_on_click(&mut self, rownum: i64, ctrl: bool, shift: bool) {
        let multiple = self.mode == SelectionMode::Multiple;

        if !multiple || !ctrl {
            self.clear();
        }

        if multiple && shift {
            self.add_range(self.anchor, rownum);
        }

        let toggled_off = multiple && ctrl && !shift && self.is_selected(rownum);
        if toggled_off {
            self.remove(rownum);
        } else {
            self.add(rownum);
        }

        if self.count() == 1 {
            self.anchor = self.current;
        }
    }

    /// Drop selected rows at or beyond `numrows`.
    ///
    /// Used when the listing shrinks; the caller is responsible for moving
    /// the current selection back inside range afterward.
    pub fn clamp_to(&mut self, numrows: i64) {
        if self.order.iter().all(|r| *r < numrows) {
            return;
        }
        tracing::debug!(
            target: "quaver_ui::selection",
            numrows,
            "dropping out-of-range selections"
        );
        self.order.retain(|r| *r < numrows);
        self.rows.retain(|r| *r < numrows);
        if let Some(max) = self.order.iter().copied().max() {
            if self.current >= numrows {
                self.current = max;
            }
        }
    }

    /// Replace this selection with a copy of another one.
    pub fn copy_from(&mut self, other: &RowSelection) {
        self.order = other.order.clone();
        self.rows = other.rows.clone();
        self.current = other.current;
        self.anchor = other.anchor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi() -> RowSelection {
        let mut sel = RowSelection::new();
        sel.set_mode(SelectionMode::Multiple);
        sel
    }

    #[test]
    fn starts_with_row_zero_selected() {
        let sel = RowSelection::new();
        assert!(sel.is_selected(0));
        assert_eq!(sel.count(), 1);
        assert_eq!(sel.current(), Some(0));
        assert_eq!(sel.anchor(), 0);
    }

    #[test]
    fn single_mode_holds_at_most_one_row() {
        let mut sel = RowSelection::new();
        sel.add(5);
        sel.add(9);
        assert_eq!(sel.count(), 1);
        assert!(sel.is_selected(9));
        assert_eq!(sel.current(), Some(9));
    }

    #[test]
    fn plain_click_clears_previous_selections() {
        let mut sel = multi();
        sel.update_on_click(3, false, false);
        sel.update_on_click(7, true, false);
        assert_eq!(sel.count(), 2);

        sel.update_on_click(5, false, false);
        assert_eq!(sel.rows_ascending(), vec![5]);
        assert_eq!(sel.anchor(), 5);
    }

    #[test]
    fn ctrl_toggle_is_its_own_inverse() {
        let mut sel = multi();
        sel.update_on_click(3, false, false);
        sel.update_on_click(7, true, false);
        let before = sel.rows_ascending();

        sel.update_on_click(9, true, false);
        sel.update_on_click(9, true, false);
        assert_eq!(sel.rows_ascending(), before);
    }

    #[test]
    fn ctrl_toggle_off_moves_current_to_highest_remaining() {
        let mut sel = multi();
        sel.update_on_click(4, false, false);
        sel.update_on_click(8, true, false);
        sel.update_on_click(2, true, false);
        assert_eq!(sel.current(), Some(2));

        sel.update_on_click(2, true, false);
        assert_eq!(sel.rows_ascending(), vec![4, 8]);
        assert_eq!(sel.current(), Some(8));
    }

    #[test]
    fn shift_range_is_symmetric_in_anchor_order() {
        let mut a = multi();
        a.update_on_click(3, false, false);
        a.update_on_click(8, false, true);

        let mut b = multi();
        b.update_on_click(8, false, false);
        b.update_on_click(3, false, true);

        assert_eq!(a.rows_ascending(), b.rows_ascending());
        assert_eq!(a.rows_ascending(), vec![3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn shift_range_is_idempotent() {
        let mut sel = multi();
        sel.update_on_click(2, false, false);
        sel.update_on_click(6, false, true);
        let first = sel.rows_ascending();
        sel.update_on_click(6, false, true);
        assert_eq!(sel.rows_ascending(), first);
    }

    #[test]
    fn anchor_follows_single_selection_after_toggle_off() {
        let mut sel = multi();
        sel.update_on_click(5, false, false);
        sel.update_on_click(9, true, false);
        // Toggle the anchor row itself off; the selection collapses to one
        // row and the anchor follows it.
        sel.update_on_click(5, true, false);
        assert_eq!(sel.anchor(), 9);

        sel.update_on_click(12, false, true);
        assert_eq!(sel.rows_ascending(), vec![9, 10, 11, 12]);
    }

    #[test]
    fn removing_only_row_leaves_current_in_place() {
        let mut sel = multi();
        sel.update_on_click(5, false, false);
        sel.update_on_click(5, true, false);
        assert!(sel.is_empty());
        assert_eq!(sel.current(), None);
        assert_eq!(sel.current_unchecked(), 5);
    }

    #[test]
    fn clamp_drops_out_of_range_rows() {
        let mut sel = multi();
        sel.update_on_click(2, false, false);
        sel.update_on_click(10, true, false);
        sel.update_on_click(20, true, false);

        sel.clamp_to(11);
        assert_eq!(sel.rows_ascending(), vec![2, 10]);
        assert_eq!(sel.current(), Some(10));
    }

    #[test]
    fn iteration_orders() {
        let mut sel = multi();
        sel.update_on_click(9, false, false);
        sel.update_on_click(2, true, false);
        sel.update_on_click(5, true, false);

        let insertion: Vec<i64> = sel.iter().collect();
        assert_eq!(insertion, vec![9, 2, 5]);
        assert_eq!(sel.rows_ascending(), vec![2, 5, 9]);
        assert_eq!(sel.rows_descending(), vec![9, 5, 2]);
    }

    #[test]
    fn copy_from_mirrors_everything() {
        let mut a = multi();
        a.update_on_click(3, false, false);
        a.update_on_click(6, true, false);

        let mut b = RowSelection::new();
        b.set_mode(SelectionMode::Multiple);
        b.copy_from(&a);
        assert_eq!(b.rows_ascending(), a.rows_ascending());
        assert_eq!(b.current(), a.current());
        assert_eq!(b.anchor(), a.anchor());
    }
}
