//! The virtualized listing widget.
//!
//! [`VirtualList`] displays a logical collection of N rows (N can be tens
//! of thousands) through a small, fixed pool of visual row slots. Scrolling
//! never allocates widgets: the pool is rebound to the new window of rows
//! and the consumer's row-fill callback rewrites the visible cell values.
//!
//! The widget drives a host toolkit through the [`crate::toolkit`]
//! capability traits and owns everything it creates; dropping the list
//! tears the whole widget graph down.
//!
//! # Usage sketch
//!
//! ```ignore
//! use std::rc::Rc;
//! use quaver_ui::toolkit::headless::HeadlessToolkit;
//! use quaver_ui::widget::virtual_list::{CellType, ListConfig, VirtualList};
//!
//! let kit = Rc::new(HeadlessToolkit::new());
//! let mut list = VirtualList::new(kit, None, ListConfig::new("songs").with_display_rows(10));
//! list.set_column_count(2);
//! list.make_column(0, "title", CellType::Label);
//! list.make_column(1, "artist", CellType::Label);
//! list.set_heading(0, "Title");
//! list.set_heading(1, "Artist");
//! list.set_row_fill(|list, rownum| {
//!     list.set_cell_text(rownum, 0, &format!("Song {rownum}"));
//!     list.set_cell_text(rownum, 1, "Unknown");
//! });
//! list.set_num_rows(50_000);
//! list.display();
//! ```
//!
//! # Signals
//!
//! - `selection_changed(rownum, colidx)`: the selection landed on a row
//! - `row_clicked(rownum, colidx)`: a row was clicked or activated
//! - `double_clicked(rownum, colidx)` / `right_clicked(rownum, colidx)`
//! - `display_changed(())`: the visible window moved
//!
//! # Re-entrancy
//!
//! The row-fill callback runs inside a refresh and must restrict itself to
//! the `set_cell_*` family; driving scrolls or selection from inside it is
//! rejected by the scroll guard.

pub mod column;
pub mod input;
pub mod layout;
pub mod row;
pub mod viewport;

use std::rc::Rc;

use quaver_core::Signal;

use crate::model::{MoveDirection, RowSelection, SelectionMode};
use crate::toolkit::{
    BoxOps, EditCell, ImageCell, ImageHandle, KeyPressEvent, NumericCell, ScrollbarOps,
    SharedWindow, SpinRange, TextCell, TimeFormat, ToggleCell, Toolkit, WidgetId, WidgetOps,
    WindowOps,
};
use crate::widget::class;

pub use column::{CellType, ColumnDisplay, EntryValidation, GrowPolicy};
pub use viewport::ScrollKind;

use column::{Column, EntryValidator, build_click_map};
use row::{CellWidget, SlotPool, SlotStyle};
use viewport::Viewport;

/// Column alignment re-export; columns use the toolkit alignment values.
pub use crate::toolkit::HorizontalAlign as CellAlignment;

/// Initialization progress, gating which operations are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum InitState {
    /// Constructed; no columns yet.
    Created,
    /// Columns declared; schema configuration allowed.
    Columns,
    /// Row slots created.
    Rows,
    /// Initial display done; data and selection operations allowed.
    Displayed,
}

/// Construction-time options for a [`VirtualList`].
#[derive(Debug, Clone)]
pub struct ListConfig {
    tag: String,
    display_rows: usize,
    min_width: Option<i32>,
    heading: bool,
    key_navigation: bool,
}

impl ListConfig {
    /// Creates a config with a diagnostic tag.
    ///
    /// The tag appears in every log line the list emits; give each listing
    /// a distinct one.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            display_rows: 10,
            min_width: None,
            heading: true,
            key_navigation: false,
        }
    }

    /// Initial number of display slots (heading slot included).
    ///
    /// Must be smaller than what the initial viewport can show; the layout
    /// adaptation grows it once real sizes are known.
    pub fn with_display_rows(mut self, rows: usize) -> Self {
        self.display_rows = rows.max(1);
        self
    }

    /// Minimum pixel width for the whole listing.
    pub fn with_min_width(mut self, width: i32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Drop the heading row (dropdown-style listings).
    pub fn without_heading(mut self) -> Self {
        self.heading = false;
        self
    }

    /// Route keyboard navigation through the list.
    pub fn with_key_navigation(mut self) -> Self {
        self.key_navigation = true;
        self
    }
}

/// A virtualized, multi-column listing.
pub struct VirtualList {
    tag: String,
    kit: Rc<dyn Toolkit>,
    parent_window: Option<SharedWindow>,

    container: Box<dyn BoxOps>,
    rows_box: Box<dyn BoxOps>,
    scrollbar_box: Box<dyn BoxOps>,
    scrollbar: Box<dyn ScrollbarOps>,
    /// Blank label above the scrollbar that keeps it aligned with the data
    /// rows when a heading is shown.
    heading_filler: Option<Box<dyn TextCell>>,

    columns: Vec<Column>,
    pool: SlotPool,
    view: Viewport,
    selection: RowSelection,

    init: InitState,
    /// Scroll re-entrancy guard; a scroll arriving while one is in
    /// progress is dropped, not queued.
    in_scroll: bool,
    heading_visible: bool,
    key_handling: bool,
    allow_double_click: bool,
    listing_font: bool,

    /// Host-reported geometry, in pixels.
    pub(crate) viewport_height: i32,
    pub(crate) heading_height: i32,
    pub(crate) row_height: i32,

    pub(crate) last_hover: Option<usize>,
    /// Display slot whose cell last held focus; selection moves to other
    /// slots clear the window focus when key handling is off.
    pub(crate) last_focus_dispidx: usize,
    numrows_changed: bool,

    fill_cb: Option<Rc<dyn Fn(&mut VirtualList, i64)>>,
    key_fallback: Option<Rc<dyn Fn(&KeyPressEvent) -> bool>>,

    /// The selection landed on a row: `(rownum, column)`.
    pub selection_changed: Signal<(i64, Option<usize>)>,
    /// A row was clicked with a non-secondary button, or activated with
    /// Enter: `(rownum, column)`.
    pub row_clicked: Signal<(i64, Option<usize>)>,
    /// A row was double-clicked: `(rownum, column)`.
    pub double_clicked: Signal<(i64, Option<usize>)>,
    /// A row was right-clicked: `(rownum, column)`.
    pub right_clicked: Signal<(i64, Option<usize>)>,
    /// The visible window moved.
    pub display_changed: Signal<()>,
}

impl VirtualList {
    /// Creates the listing scaffold inside the host toolkit.
    ///
    /// `parent_window` is needed only when the listing hosts focusable
    /// cells (entries, spinboxes); it is used to drop stale widget focus
    /// when the selection moves.
    pub fn new(
        kit: Rc<dyn Toolkit>,
        parent_window: Option<SharedWindow>,
        config: ListConfig,
    ) -> Self {
        let mut container = kit.create_box(crate::toolkit::Orientation::Horizontal);
        container.set_hexpand(true);
        if let Some(width) = config.min_width {
            container.set_size_request(width, -1);
        }

        let mut rows_box = kit.create_box(crate::toolkit::Orientation::Vertical);
        rows_box.set_hexpand(true);
        if config.key_navigation {
            rows_box.set_focusable(true);
        }
        container.pack_start_expand(rows_box.id());

        let mut scrollbar_box = kit.create_box(crate::toolkit::Orientation::Vertical);
        container.pack_end(scrollbar_box.id());

        let mut scrollbar = kit.create_scrollbar();
        scrollbar.set_step_increment(1.0);
        scrollbar.set_position(0.0);
        scrollbar_box.pack_end(scrollbar.id());

        let heading_offset = if config.heading { 1 } else { 0 };
        let view = Viewport::new(config.display_rows, heading_offset);

        tracing::debug!(
            target: "quaver_ui::virtlist",
            tag = %config.tag,
            display_rows = config.display_rows,
            heading = config.heading,
            "created"
        );

        let mut list = Self {
            tag: config.tag,
            kit,
            parent_window,
            container,
            rows_box,
            scrollbar_box,
            scrollbar,
            heading_filler: None,
            columns: Vec::new(),
            pool: SlotPool::new(),
            view,
            selection: RowSelection::new(),
            init: InitState::Created,
            in_scroll: false,
            heading_visible: config.heading,
            key_handling: config.key_navigation,
            allow_double_click: false,
            listing_font: false,
            viewport_height: 0,
            heading_height: 0,
            row_height: 0,
            last_hover: None,
            last_focus_dispidx: 0,
            numrows_changed: false,
            fill_cb: None,
            key_fallback: None,
            selection_changed: Signal::new(),
            row_clicked: Signal::new(),
            double_clicked: Signal::new(),
            right_clicked: Signal::new(),
            display_changed: Signal::new(),
        };
        list.configure_scrollbar();
        list
    }

    // =========================================================================
    // Identity and introspection
    // =========================================================================

    /// The diagnostic tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Toolkit id of the outer container, for packing into host layouts.
    pub fn container_id(&self) -> WidgetId {
        self.container.id()
    }

    /// Toolkit id of the rows area (event wiring).
    pub fn rows_box_id(&self) -> WidgetId {
        self.rows_box.id()
    }

    /// Toolkit id of the scrollbar (event wiring).
    pub fn scrollbar_id(&self) -> WidgetId {
        self.scrollbar.id()
    }

    /// Toolkit id of a display slot's row box.
    pub fn row_box_id(&self, dispidx: usize) -> Option<WidgetId> {
        self.pool
            .slot(dispidx)
            .and_then(|slot| slot.row_box.as_ref().map(|b| b.id()))
    }

    /// Toolkit id of a cell widget by display slot.
    pub fn cell_widget_id(&self, dispidx: usize, colidx: usize) -> Option<WidgetId> {
        let slot = self.pool.slot(dispidx)?;
        let cell = slot.cells.get(colidx)?;
        cell_widget_id(&cell.widget)
    }

    /// Total logical rows.
    pub fn num_rows(&self) -> i64 {
        self.view.numrows()
    }

    /// Display slots, heading included.
    pub fn display_size(&self) -> usize {
        self.view.dispsize()
    }

    /// Logical row shown in the first data slot.
    pub fn row_offset(&self) -> i64 {
        self.view.rowoffset()
    }

    // =========================================================================
    // Appearance flags
    // =========================================================================

    /// Style the listing for placement over a dark background.
    pub fn set_dark_background(&mut self) {
        self.container.add_class(class::DARK_BG);
    }

    /// Style the rows area as a dropdown popup surface.
    pub fn set_dropdown_background(&mut self) {
        self.rows_box.add_class(class::NORMAL_BG);
    }

    /// Use the condensed listing font classes on every cell.
    ///
    /// Must be called before [`display`](Self::display).
    pub fn set_listing_font(&mut self) {
        self.listing_font = true;
    }

    /// Allow ctrl-toggle and shift-range multi-selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    /// Deliver double-click events instead of ignoring them.
    pub fn set_allow_double_click(&mut self) {
        self.allow_double_click = true;
    }

    // =========================================================================
    // Column schema
    // =========================================================================

    /// Declare the number of columns. Must be called exactly once, before
    /// any other schema call.
    pub fn set_column_count(&mut self, count: usize) {
        if self.init >= InitState::Rows {
            tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, "column count change after display ignored");
            return;
        }
        self.columns = (0..count).map(|_| Column::new()).collect();
        self.init = InitState::Columns;
        tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, count, "columns declared");
    }

    /// Set a column's cell type.
    ///
    /// Internal-numeric columns are forced to [`ColumnDisplay::Disable`];
    /// they carry per-row values without a widget.
    pub fn make_column(&mut self, colidx: usize, tag: impl Into<String>, cell_type: CellType) {
        if !self.check_column(InitState::Columns, colidx, "make_column") {
            return;
        }
        let column = &mut self.columns[colidx];
        column.tag = tag.into();
        column.cell_type = cell_type;
        if cell_type == CellType::InternalNumeric {
            column.display = ColumnDisplay::Disable;
        }
    }

    /// Declare an entry column with character sizing.
    pub fn make_entry_column(
        &mut self,
        colidx: usize,
        tag: impl Into<String>,
        width_chars: i32,
        max_chars: i32,
    ) {
        if !self.check_column(InitState::Columns, colidx, "make_entry_column") {
            return;
        }
        let column = &mut self.columns[colidx];
        column.tag = tag.into();
        column.cell_type = CellType::Entry;
        column.entry_width = width_chars;
        column.entry_max_width = max_chars;
    }

    /// Declare a numeric spinbox column.
    pub fn make_spinbox_column(&mut self, colidx: usize, tag: impl Into<String>, range: SpinRange) {
        if !self.check_column(InitState::Columns, colidx, "make_spinbox_column") {
            return;
        }
        let column = &mut self.columns[colidx];
        column.tag = tag.into();
        column.cell_type = CellType::NumericSpinbox;
        column.spin_range = range;
    }

    /// Declare a time spinbox column (values in seconds).
    pub fn make_time_column(&mut self, colidx: usize, tag: impl Into<String>, format: TimeFormat) {
        if !self.check_column(InitState::Columns, colidx, "make_time_column") {
            return;
        }
        let column = &mut self.columns[colidx];
        column.tag = tag.into();
        column.cell_type = CellType::TimeSpinbox;
        column.time_format = format;
    }

    /// Set a column's heading text. Ignored when the list has no heading
    /// row.
    pub fn set_heading(&mut self, colidx: usize, heading: impl Into<String>) {
        if !self.check_column(InitState::Columns, colidx, "set_heading") {
            return;
        }
        if !self.heading_visible {
            tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, colidx, "heading set on heading-less list");
            return;
        }
        self.columns[colidx].heading = Some(heading.into());
    }

    /// Minimum column width in characters (label columns).
    pub fn set_column_min_width(&mut self, colidx: usize, chars: i32) {
        if !self.check_column(InitState::Columns, colidx, "set_column_min_width") {
            return;
        }
        self.columns[colidx].min_width_chars = Some(chars);
    }

    /// Ellipsize overflowing text. Implies [`GrowPolicy::GrowShrink`].
    pub fn set_column_ellipsize(&mut self, colidx: usize) {
        if !self.check_column(InitState::Columns, colidx, "set_column_ellipsize") {
            return;
        }
        let column = &mut self.columns[colidx];
        column.ellipsize = true;
        column.grow = GrowPolicy::GrowShrink;
    }

    /// Column cell alignment.
    pub fn set_column_align(&mut self, colidx: usize, align: CellAlignment) {
        if !self.check_column(InitState::Columns, colidx, "set_column_align") {
            return;
        }
        self.columns[colidx].align = align;
    }

    /// Column grow policy.
    pub fn set_column_grow(&mut self, colidx: usize, grow: GrowPolicy) {
        if !self.check_column(InitState::Columns, colidx, "set_column_grow") {
            return;
        }
        self.columns[colidx].grow = grow;
    }

    /// Base style class applied to every cell of the column.
    pub fn set_column_class(&mut self, colidx: usize, class_name: impl Into<String>) {
        if !self.check_column(InitState::Columns, colidx, "set_column_class") {
            return;
        }
        self.columns[colidx].base_class = Some(class_name.into());
    }

    /// Change a column's display state.
    ///
    /// [`ColumnDisplay::Disable`] on a live column clears its type to
    /// [`CellType::None`] and removes its cells from view on the next
    /// refresh. Internal-numeric columns reject display changes.
    pub fn set_column_display(&mut self, colidx: usize, display: ColumnDisplay) {
        if !self.check_column(InitState::Columns, colidx, "set_column_display") {
            return;
        }
        if self.columns[colidx].cell_type == CellType::InternalNumeric {
            tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, colidx, "display change on internal column ignored");
            return;
        }

        let previous = self.columns[colidx].display;
        self.columns[colidx].display = display;
        if display == ColumnDisplay::Disable {
            self.columns[colidx].cell_type = CellType::None;
        }
        build_click_map(&mut self.columns);

        if self.init >= InitState::Rows && previous != display {
            // Re-derive per-cell visibility on every live slot.
            for dispidx in 0..self.view.dispsize() {
                let Some(slot) = self.pool.slot(dispidx) else {
                    continue;
                };
                if slot.offscreen || slot.cleared {
                    continue;
                }
                let columns = &self.columns;
                if let Some(slot) = self.pool.slot_mut(dispidx) {
                    slot.show(columns);
                }
            }
        }
    }

    /// Register the validator for an entry column.
    pub fn set_entry_validator(
        &mut self,
        colidx: usize,
        validator: impl Fn(i64, &str) -> EntryValidation + 'static,
    ) {
        if !self.check_column(InitState::Columns, colidx, "set_entry_validator") {
            return;
        }
        if self.columns[colidx].cell_type != CellType::Entry {
            tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, colidx, "validator on non-entry column ignored");
            return;
        }
        self.columns[colidx].entry_validator = Some(Rc::new(validator) as EntryValidator);
    }

    /// The change signal of a toggle (checkbox/radio) column.
    pub fn toggle_changed(&self, colidx: usize) -> Option<&Signal<(i64, bool)>> {
        let column = self.columns.get(colidx)?;
        matches!(
            column.cell_type,
            CellType::Checkbox | CellType::RadioButton
        )
        .then_some(&column.toggle_changed)
    }

    /// The change signal of a spinbox column.
    pub fn spin_changed(&self, colidx: usize) -> Option<&Signal<(i64, i64)>> {
        let column = self.columns.get(colidx)?;
        matches!(
            column.cell_type,
            CellType::NumericSpinbox | CellType::TimeSpinbox
        )
        .then_some(&column.spin_changed)
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the logical row count.
    ///
    /// The scrollbar range, window offset and selection are re-derived on
    /// the refresh this triggers.
    pub fn set_num_rows(&mut self, numrows: i64) {
        self.view.set_numrows(numrows);
        self.numrows_changed = true;
        tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, numrows, "row count");
        self.configure_scrollbar();
        self.refresh();
    }

    /// Register the row-fill callback.
    ///
    /// The callback runs once per row each time that row becomes visible
    /// and must populate the visible columns through the `set_cell_*`
    /// family.
    pub fn set_row_fill(&mut self, fill: impl Fn(&mut VirtualList, i64) + 'static) {
        self.fill_cb = Some(Rc::new(fill));
    }

    /// Register the fallback handler for keys the list does not route.
    pub fn set_key_fallback(&mut self, fallback: impl Fn(&KeyPressEvent) -> bool + 'static) {
        self.key_fallback = Some(Rc::new(fallback));
    }

    /// Write a text cell (label or entry).
    pub fn set_cell_text(&mut self, rownum: i64, colidx: usize, value: &str) {
        if !self.check_row_column(rownum, colidx, "set_cell_text") {
            return;
        }
        let Some(dispidx) = self.pool.slot_for_rownum(rownum) else {
            return;
        };
        let ellipsize = self.columns[colidx].ellipsize;
        if let Some(slot) = self.pool.slot_mut(dispidx) {
            match &mut slot.cells[colidx].widget {
                CellWidget::Label(label) => {
                    label.set_text(value);
                    if ellipsize {
                        label.set_tooltip(value);
                    }
                }
                CellWidget::Entry(entry) => entry.set_value(value),
                _ => {}
            }
        }
        self.show_slot_if_cleared(dispidx);
    }

    /// Write a numeric cell (internal value, toggle state, spin value).
    pub fn set_cell_value(&mut self, rownum: i64, colidx: usize, value: i64) {
        if !self.check_row_column(rownum, colidx, "set_cell_value") {
            return;
        }
        let Some(dispidx) = self.pool.slot_for_rownum(rownum) else {
            return;
        };
        let column = &mut self.columns[colidx];
        if let Some(slot) = self.pool.slot_mut(dispidx) {
            match &mut slot.cells[colidx].widget {
                CellWidget::Internal(stored) => *stored = value,
                CellWidget::Toggle(toggle) => {
                    let was_active = toggle.is_active();
                    if value != 0 {
                        toggle.set_active(true);
                    } else {
                        // Turning a radio off hands the active state to the
                        // hidden group anchor.
                        if was_active && let Some(anchor) = &mut column.radio_anchor {
                            anchor.set_active(true);
                        }
                        toggle.set_active(false);
                    }
                }
                CellWidget::Spin(spin) => spin.set_value(value),
                _ => {}
            }
        }
        self.show_slot_if_cleared(dispidx);
    }

    /// Write an image cell; `None` clears it.
    pub fn set_cell_image(
        &mut self,
        rownum: i64,
        colidx: usize,
        image: Option<ImageHandle>,
        width: i32,
    ) {
        if !self.check_row_column(rownum, colidx, "set_cell_image") {
            return;
        }
        let Some(dispidx) = self.pool.slot_for_rownum(rownum) else {
            return;
        };
        if let Some(slot) = self.pool.slot_mut(dispidx)
            && let CellWidget::Image(cell) = &mut slot.cells[colidx].widget
        {
            match image {
                Some(handle) => {
                    cell.set_size_request(width, -1);
                    cell.set_image(handle);
                }
                None => cell.clear_image(),
            }
        }
        self.show_slot_if_cleared(dispidx);
    }

    /// Read an entry cell's edit buffer.
    pub fn cell_text(&self, rownum: i64, colidx: usize) -> Option<String> {
        if !self.check_row_column(rownum, colidx, "cell_text") {
            return None;
        }
        let dispidx = self.pool.slot_for_rownum(rownum)?;
        let slot = self.pool.slot(dispidx)?;
        match &slot.cells[colidx].widget {
            CellWidget::Entry(entry) => Some(entry.value()),
            CellWidget::Label(label) => Some(label.text()),
            _ => None,
        }
    }

    /// Read a numeric cell's value.
    pub fn cell_value(&self, rownum: i64, colidx: usize) -> Option<i64> {
        if !self.check_row_column(rownum, colidx, "cell_value") {
            return None;
        }
        let dispidx = self.pool.slot_for_rownum(rownum)?;
        let slot = self.pool.slot(dispidx)?;
        match &slot.cells[colidx].widget {
            CellWidget::Internal(stored) => Some(*stored),
            CellWidget::Toggle(toggle) => Some(toggle.is_active() as i64),
            CellWidget::Spin(spin) => Some(spin.value()),
            _ => None,
        }
    }

    /// The rendered heading text of a column.
    pub fn heading_text(&self, colidx: usize) -> Option<String> {
        if !self.heading_visible || colidx >= self.columns.len() {
            return None;
        }
        let slot = self.pool.slot(0)?;
        match &slot.cells[colidx].widget {
            CellWidget::Label(label) => Some(label.text()),
            _ => None,
        }
    }

    /// Enable or disable editing of an editable cell.
    pub fn set_cell_editable(&mut self, rownum: i64, colidx: usize, editable: bool) {
        if !self.check_row_column(rownum, colidx, "set_cell_editable") {
            return;
        }
        let Some(slot) = self.pool.slot_for_rownum_mut(rownum) else {
            return;
        };
        let cell = &mut slot.cells[colidx];
        if matches!(cell.widget, CellWidget::Entry(_) | CellWidget::Spin(_))
            && let Some(ops) = cell.widget.ops_mut()
        {
            ops.set_sensitive(editable);
        }
    }

    /// Apply a transient style class to one cell (removed on next refresh).
    pub fn set_cell_class(&mut self, rownum: i64, colidx: usize, class_name: &str) {
        if !self.check_row_column(rownum, colidx, "set_cell_class") {
            return;
        }
        let Some(slot) = self.pool.slot_for_rownum_mut(rownum) else {
            return;
        };
        let cell = &mut slot.cells[colidx];
        if let Some(old) = cell.class.take()
            && let Some(ops) = cell.widget.ops_mut()
        {
            ops.remove_class(&old);
        }
        cell.class = Some(class_name.to_string());
        if let Some(ops) = cell.widget.ops_mut() {
            ops.add_class(class_name);
        }
    }

    /// Remove a cell's transient style class.
    pub fn clear_cell_class(&mut self, rownum: i64, colidx: usize) {
        if !self.check_row_column(rownum, colidx, "clear_cell_class") {
            return;
        }
        let Some(slot) = self.pool.slot_for_rownum_mut(rownum) else {
            return;
        };
        let cell = &mut slot.cells[colidx];
        if let Some(old) = cell.class.take()
            && let Some(ops) = cell.widget.ops_mut()
        {
            ops.remove_class(&old);
        }
    }

    /// Stage a row style class, applied to the row's label cells on the
    /// next refresh.
    pub fn set_row_class(&mut self, rownum: i64, class_name: &str) {
        if !self.check_state(InitState::Columns, "set_row_class") {
            return;
        }
        if let Some(slot) = self.pool.slot_for_rownum_mut(rownum) {
            slot.stage_class(class_name);
        }
    }

    /// Pin the slot currently showing `rownum` to that row.
    ///
    /// Pinned slots are exempt from scroll recycling; the row behaves like
    /// a secondary heading.
    pub fn set_row_lock(&mut self, rownum: i64) {
        if !self.check_state(InitState::Columns, "set_row_lock") {
            return;
        }
        let Some(dispidx) = self.view.dispidx_for(rownum) else {
            tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, rownum, "lock target not visible");
            return;
        };
        let mut newly_locked = false;
        if let Some(slot) = self.pool.slot_mut(dispidx) {
            newly_locked = slot.lock_rownum.is_none();
            slot.lock(rownum);
        }
        if newly_locked {
            self.view.set_lock_count(self.view.lock_count() + 1);
        }
        self.configure_scrollbar();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Number of selected rows.
    pub fn selection_count(&self) -> usize {
        self.selection.count()
    }

    /// The current selection, if any.
    pub fn current_selection(&self) -> Option<i64> {
        self.selection.current()
    }

    /// Whether a row is selected.
    pub fn is_row_selected(&self, rownum: i64) -> bool {
        self.selection.is_selected(rownum)
    }

    /// Selected rows in ascending order.
    pub fn selected_rows(&self) -> Vec<i64> {
        self.selection.rows_ascending()
    }

    /// Selected rows in descending order.
    pub fn selected_rows_descending(&self) -> Vec<i64> {
        self.selection.rows_descending()
    }

    /// Select exactly one row, scrolling it into view.
    ///
    /// When the row is already the sole selection and on-screen, the
    /// selection set is left untouched (no clear/re-add flicker) and only
    /// the minimal scroll runs.
    pub fn set_selection(&mut self, rownum: i64) {
        if !self.check_row(rownum, "set_selection") {
            return;
        }
        let rownum = self.view.clamp_rownum(rownum);
        self.process_scroll(rownum, ScrollKind::Normal);

        let sole = self.selection.count() == 1 && self.selection.is_selected(rownum);
        if sole {
            self.selection.add(rownum);
        } else {
            self.selection.update_on_click(rownum, false, false);
            self.sync_selection_display();
        }
        self.emit_selection_changed(rownum, None);
    }

    /// Add a row to the selection without scrolling or clearing.
    pub fn append_selection(&mut self, rownum: i64) {
        if !self.check_row(rownum, "append_selection") {
            return;
        }
        let rownum = self.view.clamp_rownum(rownum);
        self.selection.add(rownum);
        self.apply_display_selections();
        if self.selection.count() == 1 {
            self.selection.set_anchor(rownum);
        }
    }

    /// Move the current selection and return where it landed.
    pub fn move_selection(&mut self, direction: MoveDirection) -> i64 {
        if !self.check_state(InitState::Displayed, "move_selection") {
            return self.selection.current_unchecked();
        }
        let delta = match direction {
            MoveDirection::Previous => -1,
            MoveDirection::Next => 1,
            MoveDirection::PageBackward => -self.view.page_rows(),
            MoveDirection::PageForward => self.view.page_rows(),
        };
        let target = self
            .view
            .clamp_rownum(self.selection.current_unchecked() + delta);
        self.set_selection(target);
        target
    }

    /// Replace this list's selection with another list's.
    pub fn copy_selection_from(&mut self, other: &VirtualList) {
        tracing::debug!(
            target: "quaver_ui::virtlist",
            from = %other.tag,
            to = %self.tag,
            "copying selection"
        );
        self.selection.copy_from(&other.selection);
        self.sync_selection_display();
        for rownum in self.selection.rows_ascending() {
            self.emit_selection_changed(rownum, None);
        }
        self.copy_position_from(other);
    }

    /// Scroll to the same window position as another list.
    pub fn copy_position_from(&mut self, other: &VirtualList) {
        self.process_scroll(other.view.rowoffset(), ScrollKind::Forced);
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Build the slots and produce the initial display.
    ///
    /// Schema configuration is sealed from here on.
    pub fn display(&mut self) {
        if !self.check_state(InitState::Columns, "display") {
            return;
        }
        let style = SlotStyle {
            listing_font: self.listing_font,
        };
        self.pool.ensure_capacity(
            self.view.dispsize(),
            self.kit.as_ref(),
            &mut self.columns,
            self.rows_box.as_mut(),
            self.heading_visible,
            style,
        );
        self.init = InitState::Rows;
        tracing::debug!(target: "quaver_ui::virtlist", tag = %self.tag, "slots created");

        build_click_map(&mut self.columns);
        self.scrollbar.set_position(0.0);
        self.init = InitState::Displayed;

        self.write_headings();
        self.refresh();
    }

    /// Re-derive scrollbar bounds after an external change.
    pub fn update_display(&mut self) {
        self.configure_scrollbar();
    }

    /// Rebind and refill every visible slot.
    ///
    /// Runs automatically after scrolls, row-count changes and resizes;
    /// consumers call it directly when row *content* changed in place.
    pub fn refresh(&mut self) {
        if self.init < InitState::Displayed {
            return;
        }

        // Slots past the live display window are hidden wholesale.
        for dispidx in self.view.dispsize()..self.pool.len() {
            if let Some(slot) = self.pool.slot_mut(dispidx) {
                slot.set_offscreen();
            }
        }

        self.check_display();

        // Transient classes are dropped and staged row classes rotate in
        // before values are written.
        for dispidx in self.view.heading_offset()..self.view.dispsize() {
            if self.view.rownum_for(dispidx) >= self.view.numrows() {
                continue;
            }
            let columns = &self.columns;
            if let Some(slot) = self.pool.slot_mut(dispidx) {
                slot.apply_class_transitions(columns);
            }
        }

        for dispidx in self.view.heading_offset()..self.view.dispsize() {
            let rownum = self.view.rownum_for(dispidx);
            if rownum >= self.view.numrows() {
                // Stale bindings past the data end would alias a live row.
                if let Some(slot) = self.pool.slot_mut(dispidx) {
                    slot.unbind();
                }
                continue;
            }
            let bound = {
                let Some(slot) = self.pool.slot_mut(dispidx) else {
                    continue;
                };
                slot.bind(rownum);
                slot.bound_rownum.unwrap_or(rownum)
            };

            if let Some(fill) = self.fill_cb.clone() {
                fill(self, bound);
            }

            let columns = &self.columns;
            if let Some(slot) = self.pool.slot_mut(dispidx)
                && slot.offscreen
            {
                slot.show(columns);
            }
        }

        self.sync_selection_display();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn is_displayed(&self) -> bool {
        self.init >= InitState::Displayed
    }

    pub(crate) fn emit_selection_changed(&self, rownum: i64, colidx: Option<usize>) {
        if self.in_scroll {
            return;
        }
        self.selection_changed.emit((rownum, colidx));
    }

    /// Run a scroll request through the re-entrancy guard.
    pub(crate) fn process_scroll(&mut self, want: i64, kind: ScrollKind) {
        if self.in_scroll {
            tracing::trace!(target: "quaver_ui::virtlist", tag = %self.tag, "scroll dropped, already scrolling");
            return;
        }
        self.in_scroll = true;

        let current = self.selection.current_unchecked();
        if let Some(offset) = self.view.scroll_target(want, kind, current) {
            self.view.set_rowoffset(offset);
            self.refresh();
            self.scrollbar.set_position(offset as f64);
            self.display_changed.emit(());
        }

        self.in_scroll = false;
    }

    pub(crate) fn configure_scrollbar(&mut self) {
        let page = self.view.page_rows() as f64;
        self.scrollbar.set_upper(self.view.numrows() as f64);
        self.scrollbar.set_page_increment(page / 2.0);
        self.scrollbar.set_page_size(page);
        if self.view.scrollbar_visible() {
            self.scrollbar.show();
        } else {
            self.scrollbar.hide();
        }
    }

    /// Apply row-count changes: selection clamping, tail-slot clearing and
    /// window adjustment.
    fn check_display(&mut self) {
        if self.init < InitState::Rows || !self.numrows_changed {
            return;
        }
        self.numrows_changed = false;

        let numrows = self.view.numrows();
        self.selection.clamp_to(numrows);
        if self.selection.current_unchecked() >= numrows && numrows > 0 {
            self.move_selection(MoveDirection::Previous);
        }

        self.clear_tail_slots();

        // A removal can leave the window running past the end while enough
        // rows remain to fill it.
        let clamped = self.view.clamp_offset(self.view.rowoffset());
        if clamped != self.view.rowoffset() {
            self.view.set_rowoffset(clamped);
            self.display_changed.emit(());
        }
    }

    /// Clear display slots that have no corresponding logical row.
    pub(crate) fn clear_tail_slots(&mut self) {
        let numrows = self.view.numrows();
        if self.view.data_rows() <= numrows {
            return;
        }
        let first_empty = (numrows.max(0) as usize) + self.view.heading_offset();
        for dispidx in first_empty..self.view.dispsize() {
            let columns = &self.columns;
            if let Some(slot) = self.pool.slot_mut(dispidx) {
                slot.unbind();
                slot.clear(columns);
            }
        }
    }

    fn show_slot_if_cleared(&mut self, dispidx: usize) {
        let columns = &self.columns;
        if let Some(slot) = self.pool.slot_mut(dispidx)
            && !slot.offscreen
            && slot.cleared
        {
            slot.show(columns);
        }
    }

    fn write_headings(&mut self) {
        if !self.heading_visible {
            return;
        }
        if self.heading_filler.is_none() {
            let mut filler = self.kit.create_label();
            filler.set_text(" ");
            if self.listing_font {
                filler.add_class(class::LISTING);
            }
            self.scrollbar_box.pack_start(filler.id());
            self.heading_filler = Some(filler);
        }
        let mut any = false;
        let columns = &self.columns;
        if let Some(slot) = self.pool.slot_mut(0) {
            for (colidx, column) in columns.iter().enumerate() {
                let Some(heading) = &column.heading else {
                    continue;
                };
                if let CellWidget::Label(label) = &mut slot.cells[colidx].widget {
                    label.set_text(heading);
                    any = true;
                }
            }
            if any {
                slot.show(columns);
            }
        }
    }

    /// Strip and re-apply the visual selection classes on live slots.
    pub(crate) fn sync_selection_display(&mut self) {
        self.clear_display_selections();
        self.apply_display_selections();
    }

    fn clear_display_selections(&mut self) {
        for dispidx in self.view.heading_offset()..self.view.dispsize() {
            let columns = &self.columns;
            if let Some(slot) = self.pool.slot_mut(dispidx) {
                slot.set_selected_display(columns, false);
            }
        }
    }

    fn apply_display_selections(&mut self) {
        self.remove_last_highlight();
        for rownum in self.selection.rows_ascending() {
            let Some(dispidx) = self.pool.slot_for_rownum(rownum) else {
                continue;
            };
            if dispidx >= self.view.dispsize() {
                continue;
            }
            let cleared = self.pool.slot(dispidx).map(|s| s.cleared).unwrap_or(true);
            if cleared {
                continue;
            }

            // A focused cell in a previously selected row would keep its
            // focus after the selection moved elsewhere.
            if !self.key_handling && dispidx != self.last_focus_dispidx {
                if let Some(window) = &self.parent_window {
                    window.borrow_mut().clear_focus();
                }
            }
            self.last_focus_dispidx = dispidx;

            let columns = &self.columns;
            if let Some(slot) = self.pool.slot_mut(dispidx) {
                slot.set_selected_display(columns, true);
            }
        }
    }

    pub(crate) fn remove_last_highlight(&mut self) {
        if let Some(dispidx) = self.last_hover.take()
            && let Some(slot) = self.pool.slot_mut(dispidx)
        {
            slot.set_hover_display(false);
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn check_state(&self, need: InitState, what: &str) -> bool {
        if self.init < need {
            tracing::debug!(
                target: "quaver_ui::virtlist",
                tag = %self.tag,
                what,
                state = ?self.init,
                "not ready"
            );
            return false;
        }
        true
    }

    fn check_column(&self, need: InitState, colidx: usize, what: &str) -> bool {
        if !self.check_state(need, what) {
            return false;
        }
        if colidx >= self.columns.len() {
            tracing::debug!(
                target: "quaver_ui::virtlist",
                tag = %self.tag,
                what,
                colidx,
                "column out of range"
            );
            return false;
        }
        true
    }

    fn check_row(&self, rownum: i64, what: &str) -> bool {
        if !self.check_state(InitState::Displayed, what) {
            return false;
        }
        if rownum < 0 || rownum >= self.view.numrows() {
            tracing::debug!(
                target: "quaver_ui::virtlist",
                tag = %self.tag,
                what,
                rownum,
                "row out of range"
            );
            return false;
        }
        true
    }

    fn check_row_column(&self, rownum: i64, colidx: usize, what: &str) -> bool {
        if !self.check_column(InitState::Rows, colidx, what) {
            return false;
        }
        if rownum < 0 || rownum >= self.view.numrows() {
            tracing::debug!(
                target: "quaver_ui::virtlist",
                tag = %self.tag,
                what,
                rownum,
                "row out of range"
            );
            return false;
        }
        true
    }

    /// Grow the slot pool; used by the layout adaptation.
    pub(crate) fn grow_pool(&mut self, capacity: usize) {
        let style = SlotStyle {
            listing_font: self.listing_font,
        };
        self.pool.ensure_capacity(
            capacity,
            self.kit.as_ref(),
            &mut self.columns,
            self.rows_box.as_mut(),
            self.heading_visible,
            style,
        );
    }
}

fn cell_widget_id(widget: &CellWidget) -> Option<WidgetId> {
    match widget {
        CellWidget::Label(w) => Some(w.id()),
        CellWidget::Entry(w) => Some(w.id()),
        CellWidget::Image(w) => Some(w.id()),
        CellWidget::Toggle(w) => Some(w.id()),
        CellWidget::Spin(w) => Some(w.id()),
        CellWidget::None | CellWidget::Internal(_) => None,
    }
}
