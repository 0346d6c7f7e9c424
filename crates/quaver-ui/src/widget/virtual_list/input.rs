//! Input routing for the virtual list.
//!
//! The host toolkit translates its native event stream into the structs in
//! [`crate::toolkit::events`] and feeds them here. Handlers return `true`
//! when the list consumed the event; everything runs synchronously inside
//! the calling event-handler invocation.
//!
//! Pointer events are hit-tested against the slot/column geometry the host
//! has reported: the heading and row heights give the display slot, the
//! per-column measured widths give the column. Cell-level widget
//! notifications (focus, toggles, spin changes, entry edits) arrive through
//! the `handle_cell_*`/`handle_*_changed` entry points with the display
//! slot the host wired at creation time.

use super::VirtualList;
use super::column::{CellType, EntryValidation, GrowPolicy, column_at_x};
use super::row::CellWidget;
use super::viewport::ScrollKind;
use crate::toolkit::{
    EnterEvent, Key, KeyPressEvent, KeyReleaseEvent, MouseButton, MouseDoubleClickEvent,
    MouseMoveEvent, MousePressEvent, WheelEvent, WidgetOps,
};
use crate::widget::class;

impl VirtualList {
    /// Route a key press.
    ///
    /// Navigation keys move the selection when exactly one row is selected;
    /// Enter activates the current row; anything else goes to the
    /// consumer's fallback handler.
    pub fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        if !self.is_displayed() || self.in_scroll {
            return false;
        }
        if !self.key_handling {
            return false;
        }

        if event.key.is_navigation() {
            if self.selection.count() == 1 {
                let step = if event.key.is_page_movement() {
                    self.view.page_rows()
                } else {
                    1
                };
                let delta = if event.key.is_backward() { -step } else { step };
                let target = self
                    .view
                    .clamp_rownum(self.selection.current_unchecked() + delta);

                self.process_scroll(target, ScrollKind::Keyboard);
                self.selection
                    .update_on_click(target, event.modifiers.control, event.modifiers.shift);
                self.sync_selection_display();
                self.emit_selection_changed(target, None);
            }
            // Movement keys are always handled internally.
            return true;
        }

        if event.key == Key::Enter {
            self.row_clicked
                .emit((self.selection.current_unchecked(), None));
            return true;
        }

        if let Some(fallback) = self.key_fallback.clone() {
            return fallback(event);
        }
        false
    }

    /// Key releases are ignored.
    pub fn handle_key_release(&self, _event: &KeyReleaseEvent) -> bool {
        false
    }

    /// Route a mouse button press.
    pub fn handle_mouse_press(&mut self, event: &MousePressEvent) -> bool {
        if !self.is_displayed() || self.in_scroll {
            return false;
        }

        // Wheel-emulation buttons scroll one row and never touch the
        // selection.
        if matches!(event.button, MouseButton::Button4 | MouseButton::Button5) {
            let delta = if event.button == MouseButton::Button4 {
                -1
            } else {
                1
            };
            self.process_scroll(self.view.rowoffset() + delta, ScrollKind::Forced);
            return true;
        }

        let Some((rownum, colidx)) = self.hit_test(event.pos.x, event.pos.y) else {
            return false;
        };

        self.selection
            .update_on_click(rownum, event.modifiers.control, event.modifiers.shift);
        self.sync_selection_display();

        // Selection first, then the click callbacks.
        self.emit_selection_changed(rownum, colidx);
        if event.button == MouseButton::Right {
            self.right_clicked.emit((rownum, colidx));
        } else {
            self.row_clicked.emit((rownum, colidx));
        }
        true
    }

    /// Route the second press of a double-click.
    ///
    /// Ignored unless double-clicks were enabled, and always ignored over
    /// entry cells: a double-click there is a text-editing gesture, not a
    /// row activation.
    pub fn handle_mouse_double_click(&mut self, event: &MouseDoubleClickEvent) -> bool {
        if !self.is_displayed() || self.in_scroll {
            return false;
        }
        if !self.allow_double_click {
            tracing::trace!(target: "quaver_ui::virtlist", tag = %self.tag, "double-click not enabled");
            return false;
        }
        if matches!(event.button, MouseButton::Button4 | MouseButton::Button5) {
            return false;
        }

        let Some((rownum, colidx)) = self.hit_test(event.pos.x, event.pos.y) else {
            return false;
        };
        if let Some(colidx) = colidx
            && self.columns[colidx].cell_type == CellType::Entry
        {
            tracing::trace!(target: "quaver_ui::virtlist", tag = %self.tag, colidx, "double-click over entry ignored");
            return false;
        }

        self.selection
            .update_on_click(rownum, event.modifiers.control, event.modifiers.shift);
        self.sync_selection_display();
        self.emit_selection_changed(rownum, colidx);
        self.double_clicked.emit((rownum, colidx));
        true
    }

    /// Route a scroll-wheel/trackpad event: one unit is one row, forced.
    pub fn handle_wheel(&mut self, event: &WheelEvent) -> bool {
        if !self.is_displayed() || self.in_scroll {
            return false;
        }
        if event.delta_rows == 0 {
            return false;
        }
        self.process_scroll(
            self.view.rowoffset() + event.delta_rows as i64,
            ScrollKind::Forced,
        );
        true
    }

    /// Route pointer motion: hover-highlight the row under the pointer.
    ///
    /// Selected, cleared and off-screen rows are never highlighted, and at
    /// most one row carries the highlight at a time.
    pub fn handle_mouse_move(&mut self, event: &MouseMoveEvent) -> bool {
        if !self.is_displayed() {
            return false;
        }

        self.remove_last_highlight();

        let Some(dispidx) = self.dispidx_at_y(event.pos.y) else {
            return false;
        };
        let Some(slot) = self.pool.slot_mut(dispidx) else {
            return false;
        };
        if slot.selected || slot.cleared || slot.offscreen {
            return false;
        }

        slot.set_hover_display(true);
        self.last_hover = Some(dispidx);
        false
    }

    /// Route a pointer-entered event.
    ///
    /// Grabs keyboard focus for the rows area (when key handling is on) so
    /// the user can resume keyboard navigation without clicking, and drops
    /// any stale hover highlight.
    pub fn handle_enter(&mut self, _event: &EnterEvent) -> bool {
        if self.key_handling {
            self.rows_box.grab_focus();
        }
        self.remove_last_highlight();
        false
    }

    /// Route a scrollbar position change coming back from the host.
    ///
    /// Programmatic scrollbar updates echo through this path; the scroll
    /// guard drops them.
    pub fn handle_scrollbar_changed(&mut self, value: f64) -> bool {
        if !self.is_displayed() || self.in_scroll {
            return false;
        }
        self.process_scroll(value.floor() as i64, ScrollKind::Forced);
        true
    }

    /// A focusable cell in a display slot took keyboard focus.
    ///
    /// Focus landing in a row selects it, exactly as a plain click would.
    pub fn handle_cell_focus(&mut self, dispidx: usize) {
        if !self.is_displayed() {
            return;
        }
        let Some(rownum) = self.rownum_of_slot(dispidx) else {
            return;
        };
        self.last_focus_dispidx = dispidx;

        self.selection.update_on_click(rownum, false, false);
        self.sync_selection_display();
        self.emit_selection_changed(rownum, None);
    }

    /// A toggle cell changed state under user interaction.
    pub fn handle_toggle_changed(&mut self, dispidx: usize, colidx: usize) {
        if !self.is_displayed() || colidx >= self.columns.len() {
            return;
        }
        let Some(rownum) = self.rownum_of_slot(dispidx) else {
            return;
        };
        let Some(slot) = self.pool.slot(dispidx) else {
            return;
        };
        if let CellWidget::Toggle(toggle) = &slot.cells[colidx].widget {
            let active = toggle.is_active();
            self.columns[colidx].toggle_changed.emit((rownum, active));
        }
    }

    /// A spinbox cell changed value under user interaction.
    pub fn handle_spin_changed(&mut self, dispidx: usize, colidx: usize) {
        if !self.is_displayed() || colidx >= self.columns.len() {
            return;
        }
        let Some(rownum) = self.rownum_of_slot(dispidx) else {
            return;
        };
        let Some(slot) = self.pool.slot(dispidx) else {
            return;
        };
        if let CellWidget::Spin(spin) = &slot.cells[colidx].widget {
            let value = spin.value();
            self.columns[colidx].spin_changed.emit((rownum, value));
        }
    }

    /// An entry cell's text changed; run the column validator.
    ///
    /// A rejected edit marks the cell with the entry-error class until a
    /// later edit passes.
    pub fn handle_entry_edited(&mut self, dispidx: usize, colidx: usize, text: &str) {
        if !self.is_displayed() || colidx >= self.columns.len() {
            return;
        }
        let Some(rownum) = self.rownum_of_slot(dispidx) else {
            return;
        };
        let Some(validator) = self.columns[colidx].entry_validator.clone() else {
            return;
        };
        let verdict = validator(rownum, text);
        if let Some(slot) = self.pool.slot_mut(dispidx)
            && let Some(ops) = slot.cells[colidx].widget.ops_mut()
        {
            match verdict {
                EntryValidation::Accept => ops.remove_class(class::ENTRY_ERROR),
                EntryValidation::Reject => ops.add_class(class::ENTRY_ERROR),
            }
        }
    }

    /// The host re-measured a cell's width.
    ///
    /// Grow-only columns refuse to shrink: a smaller measurement is
    /// discarded and the established width is re-requested on the
    /// reference cell.
    pub fn handle_cell_width_changed(&mut self, colidx: usize, width: i32) {
        if colidx >= self.columns.len() || width <= 0 {
            return;
        }
        let heading_offset = self.view.heading_offset();
        let column = &mut self.columns[colidx];
        if column.grow == GrowPolicy::GrowOnly {
            if width <= column.measured_width {
                return;
            }
            column.measured_width = width;
            if let Some(slot) = self.pool.slot_mut(heading_offset)
                && let Some(ops) = slot.cells[colidx].widget.ops_mut()
            {
                ops.set_size_request(width - 1, -1);
            }
        } else {
            column.measured_width = width;
        }
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// Resolve a pointer y coordinate to a display slot.
    ///
    /// Returns `None` over the heading row and outside the slot range.
    pub(crate) fn dispidx_at_y(&self, y: i32) -> Option<usize> {
        if y < 0 || self.row_height <= 0 {
            return None;
        }
        let heading_px = if self.heading_visible {
            self.heading_height
        } else {
            0
        };
        if self.heading_visible && y < heading_px {
            return None;
        }
        let dispidx =
            ((y - heading_px) / self.row_height) as usize + self.view.heading_offset();
        (dispidx < self.view.dispsize()).then_some(dispidx)
    }

    /// Resolve pointer coordinates to `(rownum, colidx)`.
    ///
    /// Rejects the heading row, cleared/off-screen slots, and stale row
    /// numbers past the current row count.
    fn hit_test(&self, x: i32, y: i32) -> Option<(i64, Option<usize>)> {
        let dispidx = self.dispidx_at_y(y)?;
        let rownum = self.rownum_of_slot(dispidx)?;
        let colidx = column_at_x(&self.columns, x);
        Some((rownum, colidx))
    }

    /// The logical row a display slot is showing, honoring locks.
    fn rownum_of_slot(&self, dispidx: usize) -> Option<i64> {
        if dispidx < self.view.heading_offset() || dispidx >= self.view.dispsize() {
            return None;
        }
        let slot = self.pool.slot(dispidx)?;
        if slot.cleared || slot.offscreen {
            return None;
        }
        let rownum = slot
            .bound_rownum
            .unwrap_or_else(|| self.view.rownum_for(dispidx));
        if rownum < 0 || rownum >= self.view.numrows() {
            tracing::debug!(
                target: "quaver_ui::virtlist",
                tag = %self.tag,
                dispidx,
                rownum,
                "stale row number rejected"
            );
            return None;
        }
        Some(rownum)
    }
}
