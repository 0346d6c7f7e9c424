//! Host-toolkit capability traits.
//!
//! The listing widgets do not render anything themselves; they drive a
//! retained-mode host toolkit through the object-safe traits in this
//! module. A host adapter implements [`Toolkit`] plus the per-widget
//! traits, wiring its native widgets behind them; the widgets own every
//! handle they create, and dropping a widget releases its whole graph.
//!
//! Identity is a toolkit-assigned [`WidgetId`] so retained backends can key
//! parent/child relationships without handing out references.

/// Toolkit-assigned widget identity.
pub type WidgetId = u64;

/// Box packing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Children packed left to right.
    Horizontal,
    /// Children packed top to bottom.
    Vertical,
}

/// Horizontal placement of a widget within its allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Align to the start (left in LTR locales).
    #[default]
    Start,
    /// Center within the allocation.
    Center,
    /// Align to the end.
    End,
    /// Fill the allocation.
    Fill,
}

/// Opaque toolkit image identifier.
///
/// Decoding and scaling are host concerns; the widget layer only forwards
/// handles into image cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Numeric spinbox configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRange {
    /// Smallest selectable value.
    pub min: f64,
    /// Largest selectable value.
    pub max: f64,
    /// Step for a single increment.
    pub step: f64,
    /// Step for a page increment.
    pub page: f64,
}

impl Default for SpinRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
            step: 1.0,
            page: 5.0,
        }
    }
}

/// Display format for time spinboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Minutes and seconds.
    #[default]
    MinSec,
    /// Minutes, seconds and tenths of a second.
    MinSecTenths,
}

/// Operations common to every toolkit widget.
pub trait WidgetOps {
    /// This widget's toolkit identity.
    fn id(&self) -> WidgetId;

    /// Make the widget visible.
    fn show(&mut self);

    /// Hide the widget, keeping it allocated.
    fn hide(&mut self);

    /// Whether the widget is currently visible.
    fn is_visible(&self) -> bool;

    /// Add a style class.
    fn add_class(&mut self, class: &str);

    /// Remove a style class. Removing an absent class is a no-op.
    fn remove_class(&mut self, class: &str);

    /// Request a minimum pixel size; -1 leaves a dimension unconstrained.
    fn set_size_request(&mut self, width: i32, height: i32);

    /// Set the leading margin in pixels.
    fn set_margin_start(&mut self, px: i32);

    /// Set the trailing margin in pixels.
    fn set_margin_end(&mut self, px: i32);

    /// Let the widget take extra horizontal space.
    fn set_hexpand(&mut self, expand: bool);

    /// Horizontal placement within the allocation.
    fn set_halign(&mut self, align: HorizontalAlign);

    /// Enable or disable user interaction.
    fn set_sensitive(&mut self, sensitive: bool);

    /// Whether the widget may receive keyboard focus.
    fn set_focusable(&mut self, focusable: bool);

    /// Take keyboard focus.
    fn grab_focus(&mut self);
}

/// A box container.
pub trait BoxOps: WidgetOps {
    /// Pack a child at the start.
    fn pack_start(&mut self, child: WidgetId);

    /// Pack a child at the start, letting it expand.
    fn pack_start_expand(&mut self, child: WidgetId);

    /// Pack a child at the end.
    fn pack_end(&mut self, child: WidgetId);
}

/// A static text cell.
pub trait TextCell: WidgetOps {
    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);

    /// The currently displayed text.
    fn text(&self) -> String;

    /// Set hover tooltip text.
    fn set_tooltip(&mut self, text: &str);

    /// Minimum width in characters.
    fn set_min_width_chars(&mut self, chars: i32);

    /// Truncate overflowing text with an ellipsis instead of growing.
    fn set_ellipsize(&mut self, on: bool);
}

/// An editable text cell.
pub trait EditCell: WidgetOps {
    /// Replace the edit buffer.
    fn set_value(&mut self, text: &str);

    /// The current edit buffer.
    fn value(&self) -> String;
}

/// A two-state cell (checkbox or radio button).
pub trait ToggleCell: WidgetOps {
    /// Set the on/off state without user interaction.
    fn set_active(&mut self, active: bool);

    /// The current on/off state.
    fn is_active(&self) -> bool;
}

/// A numeric-valued cell (spinboxes; time values are whole seconds).
pub trait NumericCell: WidgetOps {
    /// Set the current value.
    fn set_value(&mut self, value: i64);

    /// The current value.
    fn value(&self) -> i64;
}

/// An image cell.
pub trait ImageCell: WidgetOps {
    /// Display an image.
    fn set_image(&mut self, image: ImageHandle);

    /// Clear the displayed image.
    fn clear_image(&mut self);
}

/// A vertical scrollbar.
///
/// Position/range are in logical rows, expressed as f64 because host
/// scrollbars are continuous controls.
pub trait ScrollbarOps: WidgetOps {
    /// Upper bound of the range (total rows).
    fn set_upper(&mut self, upper: f64);

    /// Move the thumb.
    fn set_position(&mut self, position: f64);

    /// Current thumb position.
    fn position(&self) -> f64;

    /// Rows moved by a single step.
    fn set_step_increment(&mut self, step: f64);

    /// Rows moved by a page step.
    fn set_page_increment(&mut self, page: f64);

    /// Rows represented by the thumb itself.
    fn set_page_size(&mut self, size: f64);
}

/// A push button.
pub trait ButtonOps: WidgetOps {
    /// Replace the button label.
    fn set_text(&mut self, text: &str);
}

/// A toplevel or popup window.
pub trait WindowOps: WidgetOps {
    /// Raise and focus the window.
    fn present(&mut self);

    /// Close (hide) the window.
    fn close(&mut self);

    /// Move the window to screen coordinates.
    fn move_to(&mut self, x: i32, y: i32);

    /// Drop keyboard focus from whatever child holds it.
    fn clear_focus(&mut self);
}

/// A window shared between a widget and its owner.
///
/// Widgets that need to reach back into their hosting window (to clear
/// focus, or to close a popup) hold one of these alongside the owner.
pub type SharedWindow = std::rc::Rc<std::cell::RefCell<Box<dyn WindowOps>>>;

/// Factory for host-toolkit widgets.
///
/// One `Toolkit` instance is shared (via `Rc`) by every listing widget the
/// application creates; implementations use interior mutability for their
/// own bookkeeping.
pub trait Toolkit {
    /// Create a box container.
    fn create_box(&self, orientation: Orientation) -> Box<dyn BoxOps>;

    /// Create a text label.
    fn create_label(&self) -> Box<dyn TextCell>;

    /// Create a single-line text entry sized in characters.
    fn create_entry(&self, width_chars: i32, max_chars: i32) -> Box<dyn EditCell>;

    /// Create an image display.
    fn create_image(&self) -> Box<dyn ImageCell>;

    /// Create a checkbox with no label.
    fn create_checkbox(&self) -> Box<dyn ToggleCell>;

    /// Create a radio button, optionally joining an existing group.
    fn create_radio(&self, group: Option<&dyn ToggleCell>) -> Box<dyn ToggleCell>;

    /// Create a numeric spinbox.
    fn create_numeric_spinbox(&self, range: SpinRange) -> Box<dyn NumericCell>;

    /// Create a time-of-duration spinbox (value in seconds).
    fn create_time_spinbox(&self, format: TimeFormat) -> Box<dyn NumericCell>;

    /// Create a vertical scrollbar.
    fn create_scrollbar(&self) -> Box<dyn ScrollbarOps>;

    /// Create a push button.
    fn create_button(&self) -> Box<dyn ButtonOps>;

    /// Create an undecorated popup window.
    fn create_popup_window(&self) -> Box<dyn WindowOps>;
}
