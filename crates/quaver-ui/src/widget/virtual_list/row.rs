//! Row slots and the recycling pool.
//!
//! A [`RowSlot`] is one visual row: a box of cell widgets, one per column,
//! bound at any moment to at most one logical row number. The [`SlotPool`]
//! owns a fixed set of slots sized to the display, growing monotonically
//! and never freeing — scrolling rebinds slots to new row numbers and
//! rewrites cell values, so the cost of any scroll is O(dispsize) cell
//! writes regardless of how large the dataset is.

use crate::toolkit::{
    BoxOps, EditCell, HorizontalAlign, ImageCell, NumericCell, TextCell, ToggleCell, Toolkit,
    WidgetOps,
};
use crate::widget::class;

use super::column::{CellType, Column, ColumnDisplay, GrowPolicy};

/// The widget behind one cell, discriminated by the column's cell type.
pub(crate) enum CellWidget {
    /// Inert cell.
    None,
    /// Static text.
    Label(Box<dyn TextCell>),
    /// Editable text.
    Entry(Box<dyn EditCell>),
    /// Image display.
    Image(Box<dyn ImageCell>),
    /// Checkbox or radio button.
    Toggle(Box<dyn ToggleCell>),
    /// Numeric or time spinbox.
    Spin(Box<dyn NumericCell>),
    /// Widget-less per-row value.
    Internal(i64),
}

impl CellWidget {
    /// Generic widget operations, when the cell has a widget at all.
    pub(crate) fn ops_mut(&mut self) -> Option<&mut dyn WidgetOps> {
        match self {
            CellWidget::Label(w) => Some(w.as_mut() as &mut dyn WidgetOps),
            CellWidget::Entry(w) => Some(w.as_mut() as &mut dyn WidgetOps),
            CellWidget::Image(w) => Some(w.as_mut() as &mut dyn WidgetOps),
            CellWidget::Toggle(w) => Some(w.as_mut() as &mut dyn WidgetOps),
            CellWidget::Spin(w) => Some(w.as_mut() as &mut dyn WidgetOps),
            CellWidget::None | CellWidget::Internal(_) => None,
        }
    }
}

/// One cell of a slot: the widget plus its transient style class.
pub(crate) struct Cell {
    pub(crate) widget: CellWidget,
    /// Transient class, distinct from the column's base class; removed on
    /// the next refresh.
    pub(crate) class: Option<String>,
}

/// Creation-time options shared by every slot of a list.
#[derive(Clone, Copy)]
pub(crate) struct SlotStyle {
    pub(crate) listing_font: bool,
}

/// One visual row of the listing.
pub(crate) struct RowSlot {
    pub(crate) row_box: Option<Box<dyn BoxOps>>,
    pub(crate) cells: Vec<Cell>,
    /// Logical row currently rendered here.
    pub(crate) bound_rownum: Option<i64>,
    /// When set, the slot is pinned to this row and immune to rebinding.
    pub(crate) lock_rownum: Option<i64>,
    pub(crate) created: bool,
    /// On-screen but logically empty: all cells hidden.
    pub(crate) cleared: bool,
    /// Past the live display: the whole row box is hidden.
    pub(crate) offscreen: bool,
    /// Mirror of "this slot carries the selected class".
    pub(crate) selected: bool,
    /// Row class rotation: the class currently applied, and the one staged
    /// to replace it on the next refresh.
    pub(crate) current_class: Option<String>,
    pub(crate) pending_class: Option<String>,
    pub(crate) previous_class: Option<String>,
}

impl RowSlot {
    pub(crate) fn new() -> Self {
        Self {
            row_box: None,
            cells: Vec::new(),
            bound_rownum: None,
            lock_rownum: None,
            created: false,
            cleared: false,
            offscreen: false,
            selected: false,
            current_class: None,
            pending_class: None,
            previous_class: None,
        }
    }

    /// Create the row box and all cell widgets.
    ///
    /// Idempotent: a slot that is already created is left alone.
    pub(crate) fn create(
        &mut self,
        kit: &dyn Toolkit,
        columns: &mut [Column],
        is_heading: bool,
        style: SlotStyle,
    ) {
        if self.created {
            return;
        }

        let mut row_box = kit.create_box(crate::toolkit::Orientation::Horizontal);
        row_box.set_hexpand(true);

        for column in columns.iter_mut() {
            let widget = build_cell(kit, column, is_heading);
            let mut cell = Cell {
                widget,
                class: None,
            };

            if let Some(ops) = cell.widget.ops_mut() {
                ops.set_margin_end(3);
                match column.align {
                    HorizontalAlign::End => ops.set_halign(HorizontalAlign::End),
                    HorizontalAlign::Center => {
                        // Centering needs the widget to own the slack.
                        ops.set_halign(HorizontalAlign::Center);
                        ops.set_hexpand(true);
                    }
                    _ => ops.set_halign(HorizontalAlign::Start),
                }
                if column.grow == GrowPolicy::GrowShrink {
                    if column.cell_type == CellType::Entry {
                        ops.set_hexpand(true);
                    }
                    row_box.pack_start_expand(ops.id());
                } else {
                    row_box.pack_start(ops.id());
                }

                if is_heading {
                    ops.add_class(class::HEADING);
                    if style.listing_font {
                        ops.add_class(class::LISTING_HEAD);
                    }
                } else if style.listing_font {
                    ops.add_class(class::LISTING);
                }
                if let Some(base) = &column.base_class {
                    ops.add_class(base);
                }

                // Slots start out cleared.
                ops.hide();
            }

            self.cells.push(cell);
        }

        self.row_box = Some(row_box);
        self.created = true;
        self.cleared = true;
        self.offscreen = false;
        self.selected = false;
    }

    /// Associate this slot with a logical row.
    ///
    /// Pinned slots ignore rebinding entirely.
    pub(crate) fn bind(&mut self, rownum: i64) {
        if self.lock_rownum.is_some() {
            return;
        }
        self.bound_rownum = Some(rownum);
    }

    /// Drop the logical-row association (pinned slots keep theirs).
    pub(crate) fn unbind(&mut self) {
        if self.lock_rownum.is_some() {
            return;
        }
        self.bound_rownum = None;
    }

    /// Pin the slot to a row number.
    pub(crate) fn lock(&mut self, rownum: i64) {
        self.lock_rownum = Some(rownum);
        self.bound_rownum = Some(rownum);
    }

    /// Hide every visible cell, keeping them allocated.
    pub(crate) fn clear(&mut self, columns: &[Column]) {
        if !self.created || self.cleared {
            return;
        }
        self.cleared = true;
        self.bound_rownum = self.lock_rownum;
        for (column, cell) in columns.iter().zip(self.cells.iter_mut()) {
            if !column.is_shown() {
                continue;
            }
            if let Some(ops) = cell.widget.ops_mut() {
                ops.hide();
            }
        }
    }

    /// Un-hide the slot and its displayable cells.
    pub(crate) fn show(&mut self, columns: &[Column]) {
        if self.offscreen
            && let Some(row_box) = &mut self.row_box
        {
            row_box.show();
            self.offscreen = false;
        }
        for (column, cell) in columns.iter().zip(self.cells.iter_mut()) {
            if let Some(ops) = cell.widget.ops_mut() {
                match column.display {
                    ColumnDisplay::Show => ops.show(),
                    ColumnDisplay::Hide | ColumnDisplay::Disable => ops.hide(),
                }
            }
        }
        self.cleared = false;
    }

    /// Hide the entire row box (slot is beyond the live display).
    pub(crate) fn set_offscreen(&mut self) {
        if self.offscreen {
            return;
        }
        self.offscreen = true;
        if let Some(row_box) = &mut self.row_box {
            row_box.hide();
        }
    }

    /// Apply or remove the selection class on the box and visible cells.
    pub(crate) fn set_selected_display(&mut self, columns: &[Column], selected: bool) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        if let Some(row_box) = &mut self.row_box {
            if selected {
                row_box.add_class(class::SELECTED);
            } else {
                row_box.remove_class(class::SELECTED);
            }
        }
        for (column, cell) in columns.iter().zip(self.cells.iter_mut()) {
            if !column.is_shown() {
                continue;
            }
            if let Some(ops) = cell.widget.ops_mut() {
                if selected {
                    ops.add_class(class::SELECTED);
                } else {
                    ops.remove_class(class::SELECTED);
                }
            }
        }
    }

    /// Apply or remove the hover-highlight class on the row box.
    pub(crate) fn set_hover_display(&mut self, hover: bool) {
        if let Some(row_box) = &mut self.row_box {
            if hover {
                row_box.add_class(class::HOVER);
            } else {
                row_box.remove_class(class::HOVER);
            }
        }
    }

    /// Drop transient per-cell classes and rotate the staged row class onto
    /// the slot's label cells. Runs once per refresh for visible slots.
    pub(crate) fn apply_class_transitions(&mut self, columns: &[Column]) {
        for cell in self.cells.iter_mut() {
            if let Some(old) = cell.class.take()
                && let Some(ops) = cell.widget.ops_mut()
            {
                ops.remove_class(&old);
            }
        }

        if self.pending_class.is_none() {
            return;
        }
        for (column, cell) in columns.iter().zip(self.cells.iter_mut()) {
            if column.cell_type != CellType::Label {
                continue;
            }
            if let Some(ops) = cell.widget.ops_mut() {
                if let Some(previous) = &self.previous_class {
                    ops.remove_class(previous);
                }
                if let Some(pending) = &self.pending_class {
                    ops.add_class(pending);
                }
            }
        }
        self.previous_class = None;
        self.current_class = self.pending_class.take();
    }

    /// Stage a row class to be applied on the next refresh.
    pub(crate) fn stage_class(&mut self, class_name: &str) {
        self.previous_class = self.current_class.take();
        self.pending_class = Some(class_name.to_string());
    }
}

fn build_cell(kit: &dyn Toolkit, column: &mut Column, is_heading: bool) -> CellWidget {
    match column.effective_type(is_heading) {
        CellType::None => CellWidget::None,
        CellType::InternalNumeric => CellWidget::Internal(0),
        CellType::Label => {
            let mut label = kit.create_label();
            // Sizing belongs to the data columns; heading labels inherit
            // their width through the column itself.
            if column.cell_type == CellType::Label {
                if let Some(chars) = column.min_width_chars {
                    label.set_min_width_chars(chars);
                }
                if column.ellipsize {
                    label.set_ellipsize(true);
                }
            }
            CellWidget::Label(label)
        }
        CellType::Entry => {
            let mut entry = kit.create_entry(column.entry_width, column.entry_max_width);
            entry.set_focusable(true);
            CellWidget::Entry(entry)
        }
        CellType::Image => {
            let mut image = kit.create_image();
            image.set_margin_start(1);
            CellWidget::Image(image)
        }
        CellType::RadioButton => {
            if column.radio_anchor.is_none() {
                column.radio_anchor = Some(kit.create_radio(None));
            }
            let mut radio = kit.create_radio(column.radio_anchor.as_deref());
            radio.set_focusable(true);
            CellWidget::Toggle(radio)
        }
        CellType::Checkbox => {
            let mut checkbox = kit.create_checkbox();
            checkbox.set_focusable(true);
            CellWidget::Toggle(checkbox)
        }
        CellType::NumericSpinbox => {
            let mut spin = kit.create_numeric_spinbox(column.spin_range);
            spin.set_focusable(true);
            CellWidget::Spin(spin)
        }
        CellType::TimeSpinbox => {
            let mut spin = kit.create_time_spinbox(column.time_format);
            spin.set_focusable(true);
            CellWidget::Spin(spin)
        }
    }
}

/// The fixed, monotonically growing set of row slots.
pub(crate) struct SlotPool {
    slots: Vec<RowSlot>,
}

impl SlotPool {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slot(&self, dispidx: usize) -> Option<&RowSlot> {
        self.slots.get(dispidx)
    }

    pub(crate) fn slot_mut(&mut self, dispidx: usize) -> Option<&mut RowSlot> {
        self.slots.get_mut(dispidx)
    }

    /// The slot currently rendering a logical row, if any.
    pub(crate) fn slot_for_rownum(&self, rownum: i64) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.bound_rownum == Some(rownum))
    }

    pub(crate) fn slot_for_rownum_mut(&mut self, rownum: i64) -> Option<&mut RowSlot> {
        self.slots
            .iter_mut()
            .find(|slot| slot.bound_rownum == Some(rownum))
    }

    /// Grow the pool to hold `capacity` created, packed slots.
    ///
    /// Growth is monotonic; a smaller request is a no-op. New slots are
    /// fully created immediately so they can be shown without an
    /// allocation stall, and packed at the end of the rows box.
    pub(crate) fn ensure_capacity(
        &mut self,
        capacity: usize,
        kit: &dyn Toolkit,
        columns: &mut [Column],
        rows_box: &mut dyn BoxOps,
        heading_in_slot0: bool,
        style: SlotStyle,
    ) {
        while self.slots.len() < capacity {
            let dispidx = self.slots.len();
            let mut slot = RowSlot::new();
            let is_heading = heading_in_slot0 && dispidx == 0;
            slot.create(kit, columns, is_heading, style);
            if let Some(row_box) = &slot.row_box {
                rows_box.pack_start(row_box.id());
            }
            self.slots.push(slot);
        }
    }
}
