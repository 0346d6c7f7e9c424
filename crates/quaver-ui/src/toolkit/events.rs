//! Input-event types delivered by the host toolkit.
//!
//! The host toolkit owns the event pump; it translates its native events
//! into these plain structs and feeds them to the widget's `handle_*`
//! methods. Handlers return `true` when they consumed the event.

use super::geometry::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Only Control held.
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Returns true if any modifier is held.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
    /// Additional button 1; some pointing devices report wheel-up this way.
    Button4,
    /// Additional button 2; some pointing devices report wheel-down this way.
    Button5,
}

/// Keyboard key codes.
///
/// Only the keys the listing widgets route themselves are named; everything
/// else arrives as [`Key::Unknown`] and is offered to the consumer's
/// fallback handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Any key the widget does not route itself (native keycode).
    Unknown(u32),
}

impl Key {
    /// Check if this is a selection-movement key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::PageUp | Key::PageDown
        )
    }

    /// Check if this is a page-movement key.
    pub fn is_page_movement(&self) -> bool {
        matches!(self, Key::PageUp | Key::PageDown)
    }

    /// Check if this key moves toward lower row numbers.
    pub fn is_backward(&self) -> bool {
        matches!(self, Key::ArrowUp | Key::PageUp)
    }
}

/// A key was pressed.
#[derive(Debug, Clone)]
pub struct KeyPressEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Modifiers held at press time.
    pub modifiers: KeyboardModifiers,
    /// Whether this is an auto-repeat press.
    pub is_repeat: bool,
}

impl KeyPressEvent {
    /// Creates a key-press event with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
            is_repeat: false,
        }
    }

    /// Creates a key-press event with the given modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            is_repeat: false,
        }
    }
}

/// A key was released.
///
/// The listing widgets ignore releases; the type exists so hosts can route
/// their full key stream without filtering.
#[derive(Debug, Clone)]
pub struct KeyReleaseEvent {
    /// The key that was released.
    pub key: Key,
    /// Modifiers held at release time.
    pub modifiers: KeyboardModifiers,
}

/// A mouse button was pressed.
#[derive(Debug, Clone)]
pub struct MousePressEvent {
    /// Which button.
    pub button: MouseButton,
    /// Position in rows-area pixel coordinates.
    pub pos: Point,
    /// Modifiers held at press time.
    pub modifiers: KeyboardModifiers,
}

impl MousePressEvent {
    /// Creates a press event with no modifiers.
    pub fn new(button: MouseButton, pos: Point) -> Self {
        Self {
            button,
            pos,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Creates a press event with the given modifiers.
    pub fn with_modifiers(button: MouseButton, pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            pos,
            modifiers,
        }
    }
}

/// The second press of a double-click.
///
/// Hosts that detect double-clicks natively deliver this instead of a
/// second [`MousePressEvent`].
#[derive(Debug, Clone)]
pub struct MouseDoubleClickEvent {
    /// Which button.
    pub button: MouseButton,
    /// Position in rows-area pixel coordinates.
    pub pos: Point,
    /// Modifiers held at press time.
    pub modifiers: KeyboardModifiers,
}

impl MouseDoubleClickEvent {
    /// Creates a double-click event with no modifiers.
    pub fn new(button: MouseButton, pos: Point) -> Self {
        Self {
            button,
            pos,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

/// The pointer moved inside the rows area.
#[derive(Debug, Clone)]
pub struct MouseMoveEvent {
    /// Position in rows-area pixel coordinates.
    pub pos: Point,
}

impl MouseMoveEvent {
    /// Creates a move event.
    pub fn new(pos: Point) -> Self {
        Self { pos }
    }
}

/// The pointer entered the rows area.
#[derive(Debug, Clone, Default)]
pub struct EnterEvent;

/// Scroll wheel / trackpad scroll.
///
/// Deltas are in whole rows; the host collapses its native delta units.
/// Positive values scroll toward higher row numbers.
#[derive(Debug, Clone)]
pub struct WheelEvent {
    /// Signed row delta.
    pub delta_rows: i32,
    /// Position in rows-area pixel coordinates.
    pub pos: Point,
    /// Modifiers held while scrolling.
    pub modifiers: KeyboardModifiers,
}

impl WheelEvent {
    /// Creates a wheel event.
    pub fn new(delta_rows: i32, pos: Point) -> Self {
        Self {
            delta_rows,
            pos,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_key_classification() {
        assert!(Key::ArrowUp.is_navigation());
        assert!(Key::PageDown.is_navigation());
        assert!(!Key::Enter.is_navigation());
        assert!(!Key::Unknown(0x41).is_navigation());

        assert!(Key::PageUp.is_page_movement());
        assert!(!Key::ArrowDown.is_page_movement());

        assert!(Key::ArrowUp.is_backward());
        assert!(Key::PageUp.is_backward());
        assert!(!Key::ArrowDown.is_backward());
    }

    #[test]
    fn modifier_constants() {
        assert!(!KeyboardModifiers::NONE.any());
        assert!(KeyboardModifiers::SHIFT.any());
        assert!(KeyboardModifiers::CONTROL.control);
    }
}
