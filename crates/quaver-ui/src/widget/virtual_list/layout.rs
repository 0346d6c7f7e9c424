//! Resize adaptation for the virtual list.
//!
//! The host reports three measurements: the pixel height available to the
//! rows area, the rendered heading height, and the rendered height of one
//! data row. From those the list derives how many display slots fit,
//! growing the slot pool (never shrinking it) and re-clamping the window
//! when the count changes.

use super::VirtualList;

impl VirtualList {
    /// The rows area was resized to `height` pixels.
    ///
    /// Returns `true` when the display size changed.
    pub fn handle_viewport_resize(&mut self, height: i32) -> bool {
        if height == self.viewport_height {
            return false;
        }
        self.viewport_height = height;
        self.recompute_display_size()
    }

    /// The heading row's rendered height changed.
    pub fn handle_heading_height_changed(&mut self, height: i32) -> bool {
        if height == self.heading_height {
            return false;
        }
        self.heading_height = height;
        self.recompute_display_size()
    }

    /// A data row's rendered height changed.
    pub fn handle_row_height_changed(&mut self, height: i32) -> bool {
        if height == self.row_height {
            return false;
        }
        self.row_height = height;
        self.recompute_display_size()
    }

    /// Derive the display size from the current measurements.
    fn recompute_display_size(&mut self) -> bool {
        if self.viewport_height < 2 || self.row_height < 2 {
            return false;
        }

        let heading_px = if self.heading_visible {
            self.heading_height
        } else {
            0
        };
        let usable = self.viewport_height - heading_px;
        let mut slots = (usable / self.row_height).max(0) as usize;
        if self.heading_visible {
            // The heading occupies a slot of its own.
            slots += 1;
        }
        slots = slots.max(1);

        if slots == self.view.dispsize() {
            return false;
        }
        self.change_display_size(slots);
        true
    }

    /// Apply a new display size.
    ///
    /// Growth packs fully created slots immediately; shrinking only clears
    /// the excess slots, never frees them. The window offset is re-clamped
    /// so the display stays filled, and a moved window fires the
    /// display-changed notification.
    pub(crate) fn change_display_size(&mut self, new_dispsize: usize) {
        if !self.is_displayed() {
            // Before the first display only the target size is recorded;
            // the slots are built by display().
            self.view.set_dispsize(new_dispsize);
            return;
        }

        tracing::debug!(
            target: "quaver_ui::virtlist",
            tag = %self.tag,
            from = self.view.dispsize(),
            to = new_dispsize,
            "display size"
        );

        if new_dispsize > self.pool.len() {
            let previous = self.pool.len();
            self.grow_pool(new_dispsize);
            // Slots packed after the initial display start visible; the
            // tail clearing below re-hides the ones past the data.
            for dispidx in previous..new_dispsize {
                let columns = &self.columns;
                if let Some(slot) = self.pool.slot_mut(dispidx) {
                    slot.show(columns);
                }
            }
        }

        if new_dispsize < self.view.dispsize() {
            for dispidx in new_dispsize..self.view.dispsize() {
                let columns = &self.columns;
                if let Some(slot) = self.pool.slot_mut(dispidx) {
                    slot.unbind();
                    slot.clear(columns);
                }
            }
        }

        self.view.set_dispsize(new_dispsize);

        // Scrolled to the bottom and grown taller: pull the window back so
        // the display stays filled.
        let clamped = self.view.clamp_offset(self.view.rowoffset());
        let moved = clamped != self.view.rowoffset();
        if moved {
            self.view.set_rowoffset(clamped);
        }

        self.clear_tail_slots();
        self.configure_scrollbar();
        self.refresh();
        if moved {
            self.display_changed.emit(());
        }
    }
}
