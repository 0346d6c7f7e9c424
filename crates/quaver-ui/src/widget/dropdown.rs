//! Dropdown selector built on the virtual list.
//!
//! [`Dropdown`] is a button that opens a popup window containing one
//! [`VirtualList`] with a single label column, no heading, and keyboard
//! navigation — a scrollable choice list that stays cheap no matter how
//! many items it holds. Choosing a row closes the popup, optionally
//! replaces the button title with the chosen text, and emits
//! `selection_made`.
//!
//! The embedded list is created lazily with the popup on the first click,
//! so dormant dropdowns cost one button.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use quaver_core::Signal;

use crate::model::SelectionMode;
use crate::toolkit::{ButtonOps, SharedWindow, Toolkit, WidgetId, WidgetOps, WindowOps};
use crate::widget::virtual_list::{CellType, ListConfig, VirtualList};

/// Most rows a dropdown popup shows at once.
const MAX_VISIBLE_ROWS: usize = 10;

/// One selectable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    /// Consumer key reported on selection.
    pub key: i64,
    /// Text shown in the list and, optionally, on the button.
    pub display: String,
}

impl DropdownItem {
    /// Creates an item.
    pub fn new(key: i64, display: impl Into<String>) -> Self {
        Self {
            key,
            display: display.into(),
        }
    }
}

/// Construction-time options for a [`Dropdown`].
#[derive(Debug, Clone)]
pub struct DropdownConfig {
    tag: String,
    title: String,
    replace_title: bool,
}

impl DropdownConfig {
    /// Creates a config with a diagnostic tag and button title.
    pub fn new(tag: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            title: title.into(),
            replace_title: false,
        }
    }

    /// Replace the button title with the selected item's text.
    pub fn with_replace_title(mut self) -> Self {
        self.replace_title = true;
        self
    }
}

/// Shared pieces the selection closure needs while the list is emitting.
struct DropdownState {
    selected_idx: usize,
    open: bool,
    /// Suppresses selection echo while the dropdown itself updates the
    /// embedded list.
    in_change: bool,
}

/// A popup choice list.
pub struct Dropdown {
    tag: String,
    kit: Rc<dyn Toolkit>,
    button: Rc<RefCell<Box<dyn ButtonOps>>>,
    window: Option<SharedWindow>,
    list: Option<VirtualList>,
    items: Rc<RefCell<Vec<DropdownItem>>>,
    key_lookup: HashMap<i64, usize>,
    /// Longest display text, in characters.
    display_width: usize,
    title: String,
    replace_title: bool,
    state: Rc<RefCell<DropdownState>>,
    /// A row was chosen: `(key, display)`.
    pub selection_made: Rc<Signal<(i64, String)>>,
}

impl Dropdown {
    /// Creates the dropdown button; the popup is built on first open.
    pub fn new(kit: Rc<dyn Toolkit>, config: DropdownConfig, items: Vec<DropdownItem>) -> Self {
        let button = kit.create_button();
        let mut dropdown = Self {
            tag: config.tag,
            kit,
            button: Rc::new(RefCell::new(button)),
            window: None,
            list: None,
            items: Rc::new(RefCell::new(Vec::new())),
            key_lookup: HashMap::new(),
            display_width: 0,
            title: config.title,
            replace_title: config.replace_title,
            state: Rc::new(RefCell::new(DropdownState {
                selected_idx: 0,
                open: false,
                in_change: false,
            })),
            selection_made: Rc::new(Signal::new()),
        };
        dropdown.set_items(items);
        let title = dropdown.title.clone();
        dropdown.set_button_text(&title);
        dropdown
    }

    /// The diagnostic tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Toolkit id of the button, for packing and click wiring.
    pub fn button_id(&self) -> WidgetId {
        self.button.borrow().id()
    }

    /// The embedded list, once the popup has been created.
    pub fn list(&self) -> Option<&VirtualList> {
        self.list.as_ref()
    }

    /// Mutable access to the embedded list for event routing.
    pub fn list_mut(&mut self) -> Option<&mut VirtualList> {
        self.list.as_mut()
    }

    /// Whether the popup is currently open.
    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    /// Index of the selected item.
    pub fn selection_index(&self) -> usize {
        self.state.borrow().selected_idx
    }

    /// Key of the selected item, if the list is non-empty.
    pub fn selected_key(&self) -> Option<i64> {
        let items = self.items.borrow();
        items.get(self.selection_index()).map(|item| item.key)
    }

    /// Replace the item list.
    pub fn set_items(&mut self, items: Vec<DropdownItem>) {
        self.display_width = items
            .iter()
            .map(|item| item.display.chars().count())
            .max()
            .unwrap_or(0);
        self.key_lookup = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.key, idx))
            .collect();
        let count = items.len();
        *self.items.borrow_mut() = items;

        if let Some(list) = self.list.as_mut() {
            list.set_column_min_width(0, self.display_width as i32);
            list.set_num_rows(count as i64);
        }
    }

    /// Select an item by list position.
    pub fn set_selection_index(&mut self, idx: usize) {
        if idx >= self.items.borrow().len() {
            tracing::debug!(target: "quaver_ui::dropdown", tag = %self.tag, idx, "selection out of range");
            return;
        }
        self.state.borrow_mut().selected_idx = idx;
        if self.replace_title {
            let display = self.items.borrow()[idx].display.clone();
            self.set_button_text(&display);
        }
        if self.list.is_some() {
            self.set_list_selection(idx);
        }
    }

    /// Select an item by consumer key.
    pub fn set_selection_by_key(&mut self, key: i64) {
        let Some(idx) = self.key_lookup.get(&key).copied() else {
            tracing::debug!(target: "quaver_ui::dropdown", tag = %self.tag, key, "unknown selection key");
            return;
        };
        self.set_selection_index(idx);
    }

    /// Enable or disable the button.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.button.borrow_mut().set_sensitive(enabled);
    }

    /// Open the popup (button click).
    pub fn handle_button_click(&mut self) {
        self.create_popup();
        if let Some(list) = self.list.as_mut() {
            list.refresh();
        }
        if let Some(window) = &self.window {
            window.borrow_mut().present();
        }
        self.state.borrow_mut().open = true;
        let idx = self.state.borrow().selected_idx;
        self.set_list_selection(idx);
        if let Some(list) = self.list.as_mut() {
            list.update_display();
        }
    }

    /// Close the popup without selecting.
    pub fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.open {
            state.open = false;
            drop(state);
            if let Some(window) = &self.window {
                window.borrow_mut().close();
            }
        }
    }

    fn set_button_text(&self, text: &str) {
        // Pad to the widest item so the button does not resize per
        // selection.
        let padded = format!("{text:<width$}", width = self.display_width);
        self.button.borrow_mut().set_text(&padded);
    }

    fn set_list_selection(&mut self, idx: usize) {
        self.state.borrow_mut().in_change = true;
        if let Some(list) = self.list.as_mut() {
            list.set_selection(idx as i64);
        }
        self.state.borrow_mut().in_change = false;
    }

    fn create_popup(&mut self) {
        if self.window.is_some() {
            return;
        }

        let window: SharedWindow = Rc::new(RefCell::new(self.kit.create_popup_window()));

        let count = self.items.borrow().len();
        let display_rows = count.clamp(1, MAX_VISIBLE_ROWS);
        let mut list = VirtualList::new(
            self.kit.clone(),
            Some(window.clone()),
            ListConfig::new(self.tag.clone())
                .with_display_rows(display_rows)
                .without_heading()
                .with_key_navigation(),
        );
        list.set_dropdown_background();
        list.set_selection_mode(SelectionMode::Single);
        list.set_column_count(1);
        list.make_column(0, "disp", CellType::Label);
        list.set_column_min_width(0, self.display_width as i32);
        list.set_num_rows(count as i64);

        let items = self.items.clone();
        list.set_row_fill(move |list, rownum| {
            let text = items
                .borrow()
                .get(rownum as usize)
                .map(|item| item.display.clone());
            if let Some(text) = text {
                list.set_cell_text(rownum, 0, &text);
            }
        });

        // Choosing a row: record it, retitle, notify, close. The guard
        // keeps programmatic selection updates from echoing here.
        let state = self.state.clone();
        let items = self.items.clone();
        let button = self.button.clone();
        let popup = window.clone();
        let selection_made = self.selection_made.clone();
        let replace_title = self.replace_title;
        let display_width = self.display_width;
        list.row_clicked.connect(move |(rownum, _colidx)| {
            if state.borrow().in_change {
                return;
            }
            let idx = *rownum as usize;
            let Some(item) = items.borrow().get(idx).cloned() else {
                return;
            };
            state.borrow_mut().selected_idx = idx;
            if replace_title {
                let padded = format!("{:<width$}", item.display, width = display_width);
                button.borrow_mut().set_text(&padded);
            }
            selection_made.emit((item.key, item.display));
            let mut state = state.borrow_mut();
            if state.open {
                state.open = false;
                popup.borrow_mut().close();
            }
        });

        list.display();

        self.window = Some(window);
        self.list = Some(list);
        tracing::debug!(target: "quaver_ui::dropdown", tag = %self.tag, rows = display_rows, "popup created");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::headless::HeadlessToolkit;
    use std::cell::Cell;

    fn items() -> Vec<DropdownItem> {
        vec![
            DropdownItem::new(10, "Waltz"),
            DropdownItem::new(20, "Tango"),
            DropdownItem::new(30, "Foxtrot"),
            DropdownItem::new(40, "Quickstep"),
        ]
    }

    #[test]
    fn popup_is_created_lazily() {
        let kit = Rc::new(HeadlessToolkit::new());
        let mut dd = Dropdown::new(
            kit.clone(),
            DropdownConfig::new("dance", "Dance"),
            items(),
        );
        assert!(dd.list().is_none());

        dd.handle_button_click();
        assert!(dd.is_open());
        let list = dd.list().expect("list created on open");
        assert_eq!(list.num_rows(), 4);
        // One column, no heading: four display slots.
        assert_eq!(list.display_size(), 4);
    }

    #[test]
    fn selecting_a_row_closes_and_notifies() {
        let kit = Rc::new(HeadlessToolkit::new());
        let mut dd = Dropdown::new(
            kit.clone(),
            DropdownConfig::new("dance", "Dance").with_replace_title(),
            items(),
        );
        dd.handle_button_click();

        let chosen: Rc<Cell<i64>> = Rc::new(Cell::new(-1));
        let chosen_c = chosen.clone();
        dd.selection_made.connect(move |(key, _)| chosen_c.set(*key));

        // The host routes Enter/click through the embedded list; emitting
        // the click signal directly exercises the same path.
        dd.list_mut().unwrap().row_clicked.emit((2, None));

        assert_eq!(chosen.get(), 30);
        assert_eq!(dd.selection_index(), 2);
        assert_eq!(dd.selected_key(), Some(30));
        assert!(!dd.is_open());

        let button = kit.record(dd.button_id()).unwrap();
        assert!(button.text.starts_with("Foxtrot"));
    }

    #[test]
    fn programmatic_selection_does_not_echo() {
        let kit = Rc::new(HeadlessToolkit::new());
        let mut dd = Dropdown::new(
            kit,
            DropdownConfig::new("dance", "Dance"),
            items(),
        );
        dd.handle_button_click();

        let fired = Rc::new(Cell::new(0));
        let fired_c = fired.clone();
        dd.selection_made.connect(move |_| fired_c.set(fired_c.get() + 1));

        dd.set_selection_by_key(20);
        assert_eq!(dd.selection_index(), 1);
        assert_eq!(fired.get(), 0);
        assert!(dd.is_open());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let kit = Rc::new(HeadlessToolkit::new());
        let mut dd = Dropdown::new(
            kit,
            DropdownConfig::new("dance", "Dance"),
            items(),
        );
        dd.set_selection_by_key(999);
        assert_eq!(dd.selection_index(), 0);
    }
}
