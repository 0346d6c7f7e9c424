//! Logging facilities for Quaver.
//!
//! Quaver uses the `tracing` crate for structured logging. To see logs,
//! install a tracing subscriber in the application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Application code...
//! }
//! ```
//!
//! Filter by subsystem with the target constants below, e.g.
//! `RUST_LOG=quaver_ui::virtlist=debug`.
//!
//! By convention, recoverable misuse of a widget API (out-of-range index,
//! call before initialization) logs at `debug` and returns without effect;
//! internal inconsistencies that should never happen log at `warn`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "quaver_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "quaver_core::signal";
    /// Virtual list widget target.
    pub const VIRTLIST: &str = "quaver_ui::virtlist";
    /// Dropdown widget target.
    pub const DROPDOWN: &str = "quaver_ui::dropdown";
    /// Selection model target.
    pub const SELECTION: &str = "quaver_ui::selection";
    /// Host-toolkit capability layer target.
    pub const TOOLKIT: &str = "quaver_ui::toolkit";
}
