//! Data-side models for the listing widgets.

pub mod selection;

pub use selection::{MoveDirection, RowSelection, SelectionMode};
