//! Visible-window math for the virtual list.
//!
//! [`Viewport`] maps the logical dataset (`numrows`) onto the fixed pool of
//! display slots (`dispsize`, heading slot included) through `rowoffset`,
//! the logical row number shown in the first data slot. All offset
//! arithmetic and clamping lives here, side-effect free; the owning widget
//! applies the results to slots and the scrollbar.

/// How a scroll request should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKind {
    /// Selection-driven: an already-visible target causes no scroll; an
    /// off-screen target is centered.
    Normal,
    /// Keyboard movement: minimal scrolling, holding the target near the
    /// window's vertical center once it crosses the midpoint.
    Keyboard,
    /// Absolute positioning (scrollbar drags, wheel, explicit API calls).
    Forced,
}

/// The visible-window state.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Total logical rows.
    numrows: i64,
    /// Display slots, heading slot included.
    dispsize: usize,
    /// 1 when slot 0 is the heading row.
    heading_offset: usize,
    /// Logical row shown in the first data slot.
    rowoffset: i64,
    /// Slots pinned to fixed rows, excluded from page math.
    lock_count: usize,
}

impl Viewport {
    /// Creates a viewport with no rows and offset 0.
    pub fn new(dispsize: usize, heading_offset: usize) -> Self {
        Self {
            numrows: 0,
            dispsize,
            heading_offset,
            rowoffset: 0,
            lock_count: 0,
        }
    }

    /// Total logical rows.
    pub fn numrows(&self) -> i64 {
        self.numrows
    }

    /// Replace the row count. The caller re-clamps the offset afterward.
    pub fn set_numrows(&mut self, numrows: i64) {
        self.numrows = numrows.max(0);
    }

    /// Display slots, heading included.
    pub fn dispsize(&self) -> usize {
        self.dispsize
    }

    /// Replace the display size.
    pub fn set_dispsize(&mut self, dispsize: usize) {
        self.dispsize = dispsize;
    }

    /// 1 when a heading row occupies slot 0.
    pub fn heading_offset(&self) -> usize {
        self.heading_offset
    }

    /// Logical row shown in the first data slot.
    pub fn rowoffset(&self) -> i64 {
        self.rowoffset
    }

    /// Set the offset without clamping (callers clamp first).
    pub fn set_rowoffset(&mut self, rowoffset: i64) {
        self.rowoffset = rowoffset;
    }

    /// Number of slots pinned to fixed rows.
    pub fn lock_count(&self) -> usize {
        self.lock_count
    }

    /// Adjust the pinned-slot count.
    pub fn set_lock_count(&mut self, lock_count: usize) {
        self.lock_count = lock_count;
    }

    /// Data slots: display slots minus the heading slot.
    pub fn data_rows(&self) -> i64 {
        self.dispsize.saturating_sub(self.heading_offset) as i64
    }

    /// Rows in a keyboard/scrollbar page: data slots minus pinned slots.
    pub fn page_rows(&self) -> i64 {
        (self.data_rows() - self.lock_count as i64).max(1)
    }

    /// Whether the scrollbar has anything to scroll.
    pub fn scrollbar_visible(&self) -> bool {
        self.numrows > self.data_rows()
    }

    /// Clamp a prospective row offset into the valid window range.
    ///
    /// The window may not run past the last row, and a dataset shorter than
    /// the window pins the offset at 0.
    pub fn clamp_offset(&self, offset: i64) -> i64 {
        let visible = self.data_rows().min(self.numrows);
        offset.max(0).min((self.numrows - visible).max(0))
    }

    /// Clamp a row number into `[0, numrows)` (0 when there are no rows).
    pub fn clamp_rownum(&self, rownum: i64) -> i64 {
        rownum.max(0).min((self.numrows - 1).max(0))
    }

    /// Whether a logical row is inside the visible window.
    pub fn is_row_visible(&self, rownum: i64) -> bool {
        rownum >= self.rowoffset
            && rownum < self.rowoffset + self.data_rows()
            && rownum < self.numrows
    }

    /// Display slot for a logical row, if it is inside the window.
    pub fn dispidx_for(&self, rownum: i64) -> Option<usize> {
        let dispidx = rownum - self.rowoffset + self.heading_offset as i64;
        if dispidx >= self.heading_offset as i64 && dispidx < self.dispsize as i64 {
            Some(dispidx as usize)
        } else {
            None
        }
    }

    /// Logical row shown in a display slot (ignoring locks).
    pub fn rownum_for(&self, dispidx: usize) -> i64 {
        dispidx as i64 - self.heading_offset as i64 + self.rowoffset
    }

    /// Compute the offset a scroll request should land on.
    ///
    /// `current` is the row the selection sat on before the request (used
    /// by the keyboard centering rule). Returns `None` when no scroll
    /// should happen.
    pub fn scroll_target(&self, want: i64, kind: ScrollKind, current: i64) -> Option<i64> {
        let data_rows = self.data_rows();
        let target = match kind {
            ScrollKind::Forced => self.clamp_offset(want),
            ScrollKind::Normal => {
                if self.is_row_visible(want) {
                    return None;
                }
                // Center the target row in the window.
                self.clamp_offset(want - data_rows / 2)
            }
            ScrollKind::Keyboard => {
                if self.is_row_visible(want) {
                    let midpoint = self.rowoffset + data_rows / 2;
                    if want < current {
                        // Moving up: nudge once the target passes above the
                        // midpoint.
                        if want < midpoint - 1 {
                            self.clamp_offset(self.rowoffset - 1)
                        } else {
                            return None;
                        }
                    } else if want >= midpoint {
                        // Moving down: nudge once the target reaches the
                        // midpoint.
                        self.clamp_offset(self.rowoffset + 1)
                    } else {
                        return None;
                    }
                } else if want < self.rowoffset {
                    self.clamp_offset(want)
                } else {
                    // Minimum scroll that brings the target onto the last
                    // data slot.
                    self.clamp_offset(want - data_rows + 1)
                }
            }
        };

        if target == self.rowoffset {
            None
        } else {
            Some(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(numrows: i64, dispsize: usize, heading_offset: usize) -> Viewport {
        let mut view = Viewport::new(dispsize, heading_offset);
        view.set_numrows(numrows);
        view
    }

    #[test]
    fn offset_clamps_to_window_range() {
        let view = viewport(100, 10, 1);
        assert_eq!(view.clamp_offset(-5), 0);
        assert_eq!(view.clamp_offset(0), 0);
        assert_eq!(view.clamp_offset(91), 91);
        assert_eq!(view.clamp_offset(92), 91);
        assert_eq!(view.clamp_offset(5000), 91);
    }

    #[test]
    fn short_dataset_pins_offset_at_zero() {
        let view = viewport(5, 10, 1);
        assert_eq!(view.clamp_offset(3), 0);
        assert_eq!(view.clamp_offset(-1), 0);
        assert!(!view.scrollbar_visible());
    }

    #[test]
    fn empty_dataset_clamps_everything_to_zero() {
        let view = viewport(0, 10, 1);
        assert_eq!(view.clamp_offset(7), 0);
        assert_eq!(view.clamp_rownum(7), 0);
        assert_eq!(view.clamp_rownum(-3), 0);
    }

    #[test]
    fn dispidx_rownum_round_trip() {
        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(20);

        assert_eq!(view.rownum_for(3), 22);
        assert_eq!(view.dispidx_for(22), Some(3));
        assert_eq!(view.dispidx_for(20), Some(1));
        assert_eq!(view.dispidx_for(28), Some(9));
        assert_eq!(view.dispidx_for(29), None);
        assert_eq!(view.dispidx_for(19), None);
    }

    #[test]
    fn normal_scroll_centers_offscreen_target() {
        // 1 heading + 9 data rows; selecting row 50 lands the window at 46.
        let view = viewport(100, 10, 1);
        assert_eq!(view.scroll_target(50, ScrollKind::Normal, 0), Some(46));
    }

    #[test]
    fn normal_scroll_leaves_visible_target_alone() {
        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(46);
        assert_eq!(view.scroll_target(50, ScrollKind::Normal, 50), None);
        assert_eq!(view.scroll_target(46, ScrollKind::Normal, 50), None);
        assert_eq!(view.scroll_target(54, ScrollKind::Normal, 50), None);
    }

    #[test]
    fn forced_scroll_is_absolute() {
        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(46);
        assert_eq!(view.scroll_target(47, ScrollKind::Forced, 50), Some(47));
        assert_eq!(view.scroll_target(46, ScrollKind::Forced, 50), None);
        assert_eq!(view.scroll_target(500, ScrollKind::Forced, 50), Some(91));
    }

    #[test]
    fn keyboard_scroll_nudges_past_midpoint() {
        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(46);

        // Down from 50: midpoint is 46 + 4 = 50, so 51 nudges the window.
        assert_eq!(view.scroll_target(51, ScrollKind::Keyboard, 50), Some(47));
        // Up from 50 to 49: still at or past midpoint - 1, no scroll.
        assert_eq!(view.scroll_target(49, ScrollKind::Keyboard, 50), None);
        // Up from 47 to 46: below midpoint - 1, nudges the window up.
        assert_eq!(view.scroll_target(46, ScrollKind::Keyboard, 47), Some(45));
    }

    #[test]
    fn keyboard_scroll_reveals_offscreen_target_minimally() {
        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(46);

        // Page jump down: target lands on the last data slot.
        assert_eq!(view.scroll_target(63, ScrollKind::Keyboard, 54), Some(55));
        // Jump up: target lands on the first data slot.
        assert_eq!(view.scroll_target(30, ScrollKind::Keyboard, 46), Some(30));
    }

    #[test]
    fn keyboard_nudge_stops_at_ends() {
        let view = viewport(100, 10, 1);
        // At the top, moving up cannot scroll further.
        assert_eq!(view.scroll_target(0, ScrollKind::Keyboard, 1), None);

        let mut view = viewport(100, 10, 1);
        view.set_rowoffset(91);
        // At the bottom, moving down cannot scroll further.
        assert_eq!(view.scroll_target(99, ScrollKind::Keyboard, 98), None);
    }

    #[test]
    fn page_rows_excludes_locks() {
        let mut view = viewport(100, 10, 1);
        assert_eq!(view.page_rows(), 9);
        view.set_lock_count(2);
        assert_eq!(view.page_rows(), 7);
    }

    #[test]
    fn offset_invariant_holds_under_mixed_updates() {
        let mut view = viewport(100, 10, 1);
        for (rows, offset) in [(100i64, 95i64), (40, 95), (40, -2), (9, 5), (0, 3), (60, 20)] {
            view.set_numrows(rows);
            view.set_rowoffset(view.clamp_offset(offset));
            let bound = (rows - view.data_rows()).max(0);
            assert!(view.rowoffset() >= 0);
            assert!(view.rowoffset() <= bound);
        }
    }
}
