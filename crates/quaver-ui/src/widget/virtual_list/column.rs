//! Column schema for the virtual list.
//!
//! Columns are declared once, configured before the first display, and
//! sealed from then on: only display state, style classes and widths may
//! change afterward. Each column describes the cell widget every row slot
//! creates at that position, plus the per-column consumer callbacks.

use std::rc::Rc;

use quaver_core::Signal;

use crate::toolkit::{HorizontalAlign, SpinRange, TimeFormat, ToggleCell};

/// What kind of cell a column produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    /// No cell; the column is inert.
    #[default]
    None,
    /// Static text.
    Label,
    /// Editable text.
    Entry,
    /// Image display.
    Image,
    /// A per-row numeric value with no widget at all; always disabled as a
    /// display column. Used to tag rows with data (database keys etc.).
    InternalNumeric,
    /// Radio button (one active row per column).
    RadioButton,
    /// Checkbox.
    Checkbox,
    /// Numeric spinbox.
    NumericSpinbox,
    /// Duration spinbox (value in seconds).
    TimeSpinbox,
}

/// Column display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnDisplay {
    /// Cells are created and shown.
    #[default]
    Show,
    /// Cells are created but kept invisible.
    Hide,
    /// No live cell at all.
    Disable,
}

/// How a column's width responds to content changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowPolicy {
    /// Width follows content both ways.
    #[default]
    Fixed,
    /// Width may grow but never shrinks back.
    GrowOnly,
    /// Width grows and shrinks with the available space (ellipsized
    /// columns).
    GrowShrink,
}

/// Outcome of an entry validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidation {
    /// The edit is acceptable.
    Accept,
    /// The edit is invalid; the cell is marked with the error class.
    Reject,
}

/// Validator for entry columns: `(rownum, text) -> verdict`.
pub type EntryValidator = Rc<dyn Fn(i64, &str) -> EntryValidation>;

/// One column of the schema.
pub(crate) struct Column {
    pub(crate) tag: String,
    pub(crate) cell_type: CellType,
    pub(crate) heading: Option<String>,
    pub(crate) base_class: Option<String>,
    pub(crate) min_width_chars: Option<i32>,
    pub(crate) entry_width: i32,
    pub(crate) entry_max_width: i32,
    pub(crate) spin_range: SpinRange,
    pub(crate) time_format: TimeFormat,
    pub(crate) display: ColumnDisplay,
    pub(crate) align: HorizontalAlign,
    pub(crate) grow: GrowPolicy,
    pub(crate) ellipsize: bool,
    /// Position among visible columns, for pointer hit-testing.
    pub(crate) click_map: Option<usize>,
    /// Last width reported by the host, in pixels (0 = not yet measured).
    pub(crate) measured_width: i32,
    /// Fired when a toggle cell changes: `(rownum, active)`.
    pub(crate) toggle_changed: Signal<(i64, bool)>,
    /// Fired when a spinbox cell changes: `(rownum, value)`.
    pub(crate) spin_changed: Signal<(i64, i64)>,
    pub(crate) entry_validator: Option<EntryValidator>,
    /// Hidden group anchor for radio columns. Activating it turns every
    /// visible radio in the column off.
    pub(crate) radio_anchor: Option<Box<dyn ToggleCell>>,
}

impl Column {
    pub(crate) fn new() -> Self {
        Self {
            tag: String::from("unset"),
            cell_type: CellType::None,
            heading: None,
            base_class: None,
            min_width_chars: None,
            entry_width: 0,
            entry_max_width: 0,
            spin_range: SpinRange::default(),
            time_format: TimeFormat::default(),
            display: ColumnDisplay::Show,
            align: HorizontalAlign::Start,
            grow: GrowPolicy::Fixed,
            ellipsize: false,
            click_map: None,
            measured_width: 0,
            toggle_changed: Signal::new(),
            spin_changed: Signal::new(),
            entry_validator: None,
            radio_anchor: None,
        }
    }

    /// Whether this column's cells are currently shown.
    pub(crate) fn is_shown(&self) -> bool {
        self.display == ColumnDisplay::Show
    }

    /// The cell type a slot actually creates at this column.
    ///
    /// Heading slots render every non-disabled column as a label.
    pub(crate) fn effective_type(&self, heading: bool) -> CellType {
        if self.display == ColumnDisplay::Disable {
            return if self.cell_type == CellType::InternalNumeric {
                CellType::InternalNumeric
            } else {
                CellType::None
            };
        }
        if heading { CellType::Label } else { self.cell_type }
    }
}

/// Assign click-map positions to the visible columns.
pub(crate) fn build_click_map(columns: &mut [Column]) {
    let mut next = 0usize;
    for column in columns.iter_mut() {
        if column.display == ColumnDisplay::Show {
            column.click_map = Some(next);
            next += 1;
        } else {
            column.click_map = None;
        }
    }
}

/// Resolve a pointer x coordinate to a column index.
///
/// Visible columns are walked in click-map order, accumulating their
/// measured widths; a coordinate past the last measured column resolves to
/// no column (the click still counts as a row click).
pub(crate) fn column_at_x(columns: &[Column], x: i32) -> Option<usize> {
    let mut ordered: Vec<(usize, usize)> = columns
        .iter()
        .enumerate()
        .filter_map(|(colidx, c)| c.click_map.map(|pos| (pos, colidx)))
        .collect();
    ordered.sort_unstable();

    let mut edge = 0i32;
    for (_, colidx) in ordered {
        let width = columns[colidx].measured_width;
        if width <= 0 {
            return None;
        }
        edge += width;
        if x < edge {
            return Some(colidx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(specs: &[(CellType, ColumnDisplay, i32)]) -> Vec<Column> {
        let mut columns: Vec<Column> = specs
            .iter()
            .map(|(cell_type, display, width)| {
                let mut c = Column::new();
                c.cell_type = *cell_type;
                c.display = *display;
                c.measured_width = *width;
                c
            })
            .collect();
        build_click_map(&mut columns);
        columns
    }

    #[test]
    fn click_map_skips_hidden_and_disabled() {
        let columns = schema(&[
            (CellType::Label, ColumnDisplay::Show, 40),
            (CellType::InternalNumeric, ColumnDisplay::Disable, 0),
            (CellType::Label, ColumnDisplay::Hide, 30),
            (CellType::Label, ColumnDisplay::Show, 60),
        ]);

        assert_eq!(columns[0].click_map, Some(0));
        assert_eq!(columns[1].click_map, None);
        assert_eq!(columns[2].click_map, None);
        assert_eq!(columns[3].click_map, Some(1));
    }

    #[test]
    fn hit_test_resolves_by_accumulated_width() {
        let columns = schema(&[
            (CellType::Label, ColumnDisplay::Show, 40),
            (CellType::InternalNumeric, ColumnDisplay::Disable, 0),
            (CellType::Label, ColumnDisplay::Show, 60),
        ]);

        assert_eq!(column_at_x(&columns, 0), Some(0));
        assert_eq!(column_at_x(&columns, 39), Some(0));
        assert_eq!(column_at_x(&columns, 40), Some(2));
        assert_eq!(column_at_x(&columns, 99), Some(2));
        assert_eq!(column_at_x(&columns, 100), None);
    }

    #[test]
    fn hit_test_gives_up_without_measurements() {
        let columns = schema(&[(CellType::Label, ColumnDisplay::Show, 0)]);
        assert_eq!(column_at_x(&columns, 5), None);
    }

    #[test]
    fn heading_renders_as_label() {
        let mut column = Column::new();
        column.cell_type = CellType::Checkbox;
        assert_eq!(column.effective_type(true), CellType::Label);
        assert_eq!(column.effective_type(false), CellType::Checkbox);

        column.display = ColumnDisplay::Disable;
        assert_eq!(column.effective_type(true), CellType::None);
    }
}
