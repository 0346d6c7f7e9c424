//! Virtualized listing widgets for the Quaver music-library UI.
//!
//! The centerpiece is [`widget::VirtualList`]: a multi-column listing that
//! renders an arbitrarily large logical dataset through a small recycled
//! pool of visual row slots, with multi-select selection, keyboard and
//! pointer routing, row locking, and dynamic resize adaptation. A
//! [`widget::Dropdown`] popup selector is built on top of it.
//!
//! The crate renders nothing itself: a host toolkit adapter implements the
//! capability traits in [`toolkit`] and forwards its input stream into the
//! widgets' `handle_*` methods. The [`toolkit::headless`] backend does the
//! same over in-memory records and carries the test suites.
//!
//! # Layout
//!
//! - [`toolkit`] — geometry, input events, widget capability traits,
//!   headless backend
//! - [`model`] — selection state
//! - [`widget`] — the virtual list and the dropdown
//!
//! # Logging
//!
//! Everything logs through `tracing`; see [`quaver_core::logging`] for the
//! target names. Recoverable API misuse (bad indices, calls before
//! initialization) is a logged no-op, never a panic.

pub mod model;
pub mod prelude;
pub mod toolkit;
pub mod widget;

pub use quaver_core;
