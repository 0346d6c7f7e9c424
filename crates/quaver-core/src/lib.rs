//! Core systems for the Quaver UI layer.
//!
//! This crate provides the foundational pieces shared by the Quaver widget
//! crates:
//!
//! - **Signal/Slot System**: Type-safe, synchronous notification between
//!   UI components ([`Signal`])
//! - **Error Types**: [`CoreError`] and friends
//! - **Logging**: `tracing` integration and per-subsystem target names
//!   ([`logging`])
//!
//! The widget layer is a single-threaded, cooperative event-loop citizen:
//! signals here dispatch directly on the calling thread and are
//! intentionally not shareable across threads.
//!
//! # Signal/Slot Example
//!
//! ```
//! use quaver_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id).unwrap();
//! ```

mod error;
pub mod logging;
mod signal;

pub use error::{CoreError, SignalError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
