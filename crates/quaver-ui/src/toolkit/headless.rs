//! Render-free toolkit backend.
//!
//! `HeadlessToolkit` implements the full capability surface over in-memory
//! records instead of native widgets. It exists so the listing widgets can
//! be exercised end-to-end — packing, visibility, style classes, cell
//! values, scrollbar geometry — without a compositor. The test suites run
//! entirely on it; it is also a reference for writing a real host adapter.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use super::widgets::{
    BoxOps, ButtonOps, EditCell, HorizontalAlign, ImageCell, ImageHandle, NumericCell,
    Orientation, ScrollbarOps, SpinRange, TextCell, TimeFormat, ToggleCell, Toolkit, WidgetId,
    WidgetOps, WindowOps,
};

/// What a headless widget was created as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Box container.
    Container,
    /// Text label.
    Label,
    /// Text entry.
    Entry,
    /// Image display.
    Image,
    /// Checkbox.
    Checkbox,
    /// Radio button.
    Radio,
    /// Numeric spinbox.
    Spinbox,
    /// Time spinbox.
    TimeSpinbox,
    /// Vertical scrollbar.
    Scrollbar,
    /// Push button.
    Button,
    /// Popup window.
    Window,
}

/// Scrollbar-specific record fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollbarRecord {
    /// Range upper bound.
    pub upper: f64,
    /// Thumb position.
    pub position: f64,
    /// Single-step increment.
    pub step_increment: f64,
    /// Page increment.
    pub page_increment: f64,
    /// Thumb page size.
    pub page_size: f64,
}

/// The recorded state of one headless widget.
#[derive(Debug, Clone)]
pub struct WidgetRecord {
    /// Creation kind.
    pub kind: WidgetKind,
    /// Visibility flag.
    pub visible: bool,
    /// Style classes currently applied.
    pub classes: BTreeSet<String>,
    /// Label text, entry value, or button label.
    pub text: String,
    /// Tooltip text.
    pub tooltip: String,
    /// Toggle on/off state.
    pub active: bool,
    /// Spinbox value.
    pub number: i64,
    /// Displayed image, if any.
    pub image: Option<ImageHandle>,
    /// Children in packing order (end-packed children appended last).
    pub children: Vec<WidgetId>,
    /// Requested minimum pixel size.
    pub size_request: (i32, i32),
    /// Minimum width in characters (labels).
    pub min_width_chars: i32,
    /// Ellipsize flag (labels).
    pub ellipsize: bool,
    /// Sensitivity (enabled/disabled).
    pub sensitive: bool,
    /// Focusability.
    pub focusable: bool,
    /// Whether this widget last grabbed focus.
    pub focused: bool,
    /// Horizontal expand flag.
    pub hexpand: bool,
    /// Horizontal alignment.
    pub halign: HorizontalAlign,
    /// Scrollbar fields (scrollbars only).
    pub scrollbar: ScrollbarRecord,
    /// Spin range (numeric spinboxes only).
    pub spin_range: SpinRange,
    /// Time display format (time spinboxes only).
    pub time_format: TimeFormat,
    /// Radio group anchor this widget was grouped with, if any.
    pub radio_group: Option<WidgetId>,
}

impl WidgetRecord {
    fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            visible: true,
            classes: BTreeSet::new(),
            text: String::new(),
            tooltip: String::new(),
            active: false,
            number: 0,
            image: None,
            children: Vec::new(),
            size_request: (-1, -1),
            min_width_chars: -1,
            ellipsize: false,
            sensitive: true,
            focusable: false,
            focused: false,
            hexpand: false,
            halign: HorizontalAlign::Start,
            scrollbar: ScrollbarRecord::default(),
            spin_range: SpinRange::default(),
            time_format: TimeFormat::default(),
            radio_group: None,
        }
    }
}

#[derive(Default)]
struct HeadlessState {
    next_id: WidgetId,
    records: HashMap<WidgetId, WidgetRecord>,
}

impl HeadlessState {
    fn create(&mut self, kind: WidgetKind) -> WidgetId {
        self.next_id += 1;
        let id = self.next_id;
        self.records.insert(id, WidgetRecord::new(kind));
        id
    }
}

/// A render-free host toolkit that records every operation.
#[derive(Clone, Default)]
pub struct HeadlessToolkit {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessToolkit {
    /// Creates an empty headless toolkit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of one widget's record.
    pub fn record(&self, id: WidgetId) -> Option<WidgetRecord> {
        self.state.borrow().records.get(&id).cloned()
    }

    /// Number of live widgets of a given kind.
    pub fn count_of(&self, kind: WidgetKind) -> usize {
        self.state
            .borrow()
            .records
            .values()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Total number of live widgets.
    pub fn widget_count(&self) -> usize {
        self.state.borrow().records.len()
    }

    /// IDs of widgets currently carrying a style class.
    pub fn widgets_with_class(&self, class: &str) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self
            .state
            .borrow()
            .records
            .iter()
            .filter(|(_, r)| r.classes.contains(class))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn widget(&self, kind: WidgetKind) -> HeadlessWidget {
        let id = self.state.borrow_mut().create(kind);
        HeadlessWidget {
            id,
            state: self.state.clone(),
        }
    }
}

/// One headless widget handle.
///
/// A single struct backs every widget trait; the record's `kind` says what
/// it was created as.
pub struct HeadlessWidget {
    id: WidgetId,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWidget {
    fn with<R>(&self, f: impl FnOnce(&mut WidgetRecord) -> R) -> R {
        let mut state = self.state.borrow_mut();
        let record = state
            .records
            .get_mut(&self.id)
            .expect("headless widget record missing");
        f(record)
    }
}

impl Drop for HeadlessWidget {
    fn drop(&mut self) {
        self.state.borrow_mut().records.remove(&self.id);
    }
}

impl WidgetOps for HeadlessWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn show(&mut self) {
        self.with(|r| r.visible = true);
    }

    fn hide(&mut self) {
        self.with(|r| r.visible = false);
    }

    fn is_visible(&self) -> bool {
        self.with(|r| r.visible)
    }

    fn add_class(&mut self, class: &str) {
        self.with(|r| {
            r.classes.insert(class.to_string());
        });
    }

    fn remove_class(&mut self, class: &str) {
        self.with(|r| {
            r.classes.remove(class);
        });
    }

    fn set_size_request(&mut self, width: i32, height: i32) {
        self.with(|r| r.size_request = (width, height));
    }

    fn set_margin_start(&mut self, _px: i32) {}

    fn set_margin_end(&mut self, _px: i32) {}

    fn set_hexpand(&mut self, expand: bool) {
        self.with(|r| r.hexpand = expand);
    }

    fn set_halign(&mut self, align: HorizontalAlign) {
        self.with(|r| r.halign = align);
    }

    fn set_sensitive(&mut self, sensitive: bool) {
        self.with(|r| r.sensitive = sensitive);
    }

    fn set_focusable(&mut self, focusable: bool) {
        self.with(|r| r.focusable = focusable);
    }

    fn grab_focus(&mut self) {
        self.with(|r| r.focused = true);
    }
}

impl BoxOps for HeadlessWidget {
    fn pack_start(&mut self, child: WidgetId) {
        self.with(|r| r.children.push(child));
    }

    fn pack_start_expand(&mut self, child: WidgetId) {
        self.with(|r| r.children.push(child));
    }

    fn pack_end(&mut self, child: WidgetId) {
        self.with(|r| r.children.push(child));
    }
}

impl TextCell for HeadlessWidget {
    fn set_text(&mut self, text: &str) {
        self.with(|r| r.text = text.to_string());
    }

    fn text(&self) -> String {
        self.with(|r| r.text.clone())
    }

    fn set_tooltip(&mut self, text: &str) {
        self.with(|r| r.tooltip = text.to_string());
    }

    fn set_min_width_chars(&mut self, chars: i32) {
        self.with(|r| r.min_width_chars = chars);
    }

    fn set_ellipsize(&mut self, on: bool) {
        self.with(|r| r.ellipsize = on);
    }
}

impl EditCell for HeadlessWidget {
    fn set_value(&mut self, text: &str) {
        self.with(|r| r.text = text.to_string());
    }

    fn value(&self) -> String {
        self.with(|r| r.text.clone())
    }
}

impl ToggleCell for HeadlessWidget {
    fn set_active(&mut self, active: bool) {
        self.with(|r| r.active = active);
    }

    fn is_active(&self) -> bool {
        self.with(|r| r.active)
    }
}

impl NumericCell for HeadlessWidget {
    fn set_value(&mut self, value: i64) {
        self.with(|r| r.number = value);
    }

    fn value(&self) -> i64 {
        self.with(|r| r.number)
    }
}

impl ImageCell for HeadlessWidget {
    fn set_image(&mut self, image: ImageHandle) {
        self.with(|r| r.image = Some(image));
    }

    fn clear_image(&mut self) {
        self.with(|r| r.image = None);
    }
}

impl ScrollbarOps for HeadlessWidget {
    fn set_upper(&mut self, upper: f64) {
        self.with(|r| r.scrollbar.upper = upper);
    }

    fn set_position(&mut self, position: f64) {
        self.with(|r| r.scrollbar.position = position);
    }

    fn position(&self) -> f64 {
        self.with(|r| r.scrollbar.position)
    }

    fn set_step_increment(&mut self, step: f64) {
        self.with(|r| r.scrollbar.step_increment = step);
    }

    fn set_page_increment(&mut self, page: f64) {
        self.with(|r| r.scrollbar.page_increment = page);
    }

    fn set_page_size(&mut self, size: f64) {
        self.with(|r| r.scrollbar.page_size = size);
    }
}

impl ButtonOps for HeadlessWidget {
    fn set_text(&mut self, text: &str) {
        self.with(|r| r.text = text.to_string());
    }
}

impl WindowOps for HeadlessWidget {
    fn present(&mut self) {
        self.with(|r| r.visible = true);
    }

    fn close(&mut self) {
        self.with(|r| r.visible = false);
    }

    fn move_to(&mut self, _x: i32, _y: i32) {}

    fn clear_focus(&mut self) {
        let mut state = self.state.borrow_mut();
        for record in state.records.values_mut() {
            record.focused = false;
        }
    }
}

impl Toolkit for HeadlessToolkit {
    fn create_box(&self, _orientation: Orientation) -> Box<dyn BoxOps> {
        Box::new(self.widget(WidgetKind::Container))
    }

    fn create_label(&self) -> Box<dyn TextCell> {
        Box::new(self.widget(WidgetKind::Label))
    }

    fn create_entry(&self, width_chars: i32, _max_chars: i32) -> Box<dyn EditCell> {
        let widget = self.widget(WidgetKind::Entry);
        widget.with(|r| r.min_width_chars = width_chars);
        Box::new(widget)
    }

    fn create_image(&self) -> Box<dyn ImageCell> {
        Box::new(self.widget(WidgetKind::Image))
    }

    fn create_checkbox(&self) -> Box<dyn ToggleCell> {
        Box::new(self.widget(WidgetKind::Checkbox))
    }

    fn create_radio(&self, group: Option<&dyn ToggleCell>) -> Box<dyn ToggleCell> {
        let widget = self.widget(WidgetKind::Radio);
        let group_id = group.map(|g| g.id());
        widget.with(|r| r.radio_group = group_id);
        Box::new(widget)
    }

    fn create_numeric_spinbox(&self, range: SpinRange) -> Box<dyn NumericCell> {
        let widget = self.widget(WidgetKind::Spinbox);
        widget.with(|r| r.spin_range = range);
        Box::new(widget)
    }

    fn create_time_spinbox(&self, format: TimeFormat) -> Box<dyn NumericCell> {
        let widget = self.widget(WidgetKind::TimeSpinbox);
        widget.with(|r| r.time_format = format);
        Box::new(widget)
    }

    fn create_scrollbar(&self) -> Box<dyn ScrollbarOps> {
        Box::new(self.widget(WidgetKind::Scrollbar))
    }

    fn create_button(&self) -> Box<dyn ButtonOps> {
        Box::new(self.widget(WidgetKind::Button))
    }

    fn create_popup_window(&self) -> Box<dyn WindowOps> {
        let mut widget = self.widget(WidgetKind::Window);
        WidgetOps::hide(&mut widget);
        Box::new(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_track_creation_and_drop() {
        let kit = HeadlessToolkit::new();
        let label = kit.create_label();
        let id = label.id();

        assert_eq!(kit.count_of(WidgetKind::Label), 1);
        assert!(kit.record(id).is_some());

        drop(label);
        assert!(kit.record(id).is_none());
        assert_eq!(kit.widget_count(), 0);
    }

    #[test]
    fn class_queries_see_applied_classes() {
        let kit = HeadlessToolkit::new();
        let mut a = kit.create_label();
        let mut b = kit.create_label();

        a.add_class("selected");
        b.add_class("selected");
        b.remove_class("selected");

        assert_eq!(kit.widgets_with_class("selected"), vec![a.id()]);
    }

    #[test]
    fn packing_records_children_in_order() {
        let kit = HeadlessToolkit::new();
        let mut parent = kit.create_box(Orientation::Horizontal);
        let a = kit.create_label();
        let b = kit.create_label();

        parent.pack_start(a.id());
        parent.pack_start_expand(b.id());

        let record = kit.record(parent.id()).unwrap();
        assert_eq!(record.children, vec![a.id(), b.id()]);
    }
}
