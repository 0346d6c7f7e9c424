//! Listing widgets.

pub mod dropdown;
pub mod virtual_list;

pub use dropdown::{Dropdown, DropdownConfig, DropdownItem};
pub use virtual_list::{
    CellAlignment, CellType, ColumnDisplay, EntryValidation, GrowPolicy, ListConfig, VirtualList,
};

/// Style class names the listing widgets apply to host widgets.
///
/// The host theme decides what each class looks like; the widgets only
/// toggle membership.
pub mod class {
    /// A selected row and its cells.
    pub const SELECTED: &str = "vl-selected";
    /// The row currently under the pointer.
    pub const HOVER: &str = "vl-hover";
    /// Heading-row cells.
    pub const HEADING: &str = "vl-heading";
    /// Data cells when the condensed listing font is enabled.
    pub const LISTING: &str = "vl-listing";
    /// Heading cells when the condensed listing font is enabled.
    pub const LISTING_HEAD: &str = "vl-listing-head";
    /// The listing container over a dark surface.
    pub const DARK_BG: &str = "vl-dark-bg";
    /// The rows area of a dropdown popup.
    pub const NORMAL_BG: &str = "vl-norm-bg";
    /// An entry cell whose current text failed validation.
    pub const ENTRY_ERROR: &str = "vl-entry-error";
}
