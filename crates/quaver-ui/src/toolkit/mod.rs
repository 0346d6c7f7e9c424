//! The host-toolkit capability layer.
//!
//! Everything the listing widgets need from the surrounding GUI toolkit —
//! widget creation, visibility, style classes, scrollbar control, input
//! events — is expressed here as plain data types and object-safe traits.
//! A host adapter implements [`Toolkit`] over its native widget set and
//! forwards its input stream into the widgets' `handle_*` methods; the
//! [`headless`] backend does the same over in-memory records for tests.

pub mod events;
pub mod geometry;
pub mod headless;
pub mod widgets;

pub use events::{
    EnterEvent, Key, KeyPressEvent, KeyReleaseEvent, KeyboardModifiers, MouseButton,
    MouseDoubleClickEvent, MouseMoveEvent, MousePressEvent, WheelEvent,
};
pub use geometry::{Point, Size};
pub use widgets::{
    BoxOps, ButtonOps, EditCell, HorizontalAlign, ImageCell, ImageHandle, NumericCell,
    Orientation, ScrollbarOps, SharedWindow, SpinRange, TextCell, TimeFormat, ToggleCell,
    Toolkit, WidgetId, WidgetOps, WindowOps,
};
