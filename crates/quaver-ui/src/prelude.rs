//! Prelude module for Quaver UI.
//!
//! Re-exports the types most consumers need:
//!
//! ```ignore
//! use quaver_ui::prelude::*;
//! ```

// ============================================================================
// Signals
// ============================================================================

pub use quaver_core::{ConnectionId, Signal};

// ============================================================================
// Toolkit capability layer
// ============================================================================

pub use crate::toolkit::{
    EnterEvent, ImageHandle, Key, KeyPressEvent, KeyboardModifiers, MouseButton,
    MouseDoubleClickEvent, MouseMoveEvent, MousePressEvent, Point, SharedWindow, Size, SpinRange,
    TimeFormat, Toolkit, WheelEvent, WidgetId,
};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{MoveDirection, SelectionMode};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::{
    CellAlignment, CellType, ColumnDisplay, Dropdown, DropdownConfig, DropdownItem,
    EntryValidation, GrowPolicy, ListConfig, VirtualList,
};
