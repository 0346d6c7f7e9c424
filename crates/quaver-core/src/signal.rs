//! Signal/slot system for Quaver.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism for
//! communication between UI components. Signals are emitted by widgets when
//! their state changes, and connected slots (callbacks) are invoked in
//! response.
//!
//! Unlike a general-purpose signal bus, these signals live on the GUI thread
//! and are invoked synchronously: every emit runs every connected slot to
//! completion before returning, in the order the slots were connected. There
//! is no queued delivery and no cross-thread dispatch — the widget layer is
//! single-threaded by design, and `Signal` is deliberately `!Send + !Sync`.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Re-entrancy
//!
//! A slot may freely connect to, disconnect from, or emit the signal that is
//! currently invoking it. Slots added during an emit are not invoked by that
//! emit; slots removed during an emit are still invoked if they were
//! connected when the emit started.
//!
//! # Example
//!
//! ```
//! use quaver_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id).unwrap();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Rc<dyn Fn(&Args)>,
}

type ConnectionMap<Args> = SlotMap<ConnectionId, Connection<Args>>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked synchronously
/// with a shared reference to the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(i64, usize)` for multiple
///   arguments.
///
/// # Blocking
///
/// Emission can be temporarily suppressed with [`set_blocked`]
/// (`Signal::set_blocked`). This is useful while a widget updates its own
/// state programmatically and must not echo the change back to consumers.
pub struct Signal<Args> {
    /// All active connections.
    connections: Rc<RefCell<ConnectionMap<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: Cell<bool>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Rc::new(RefCell::new(SlotMap::with_key())),
            blocked: Cell::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect the slot
    /// later. Slots are invoked in connection order.
    ///
    /// # Example
    ///
    /// ```
    /// use quaver_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        self.connections.borrow_mut().insert(Connection {
            slot: Rc::new(slot),
        })
    }

    /// Connect a slot whose lifetime is managed by the returned guard.
    ///
    /// The connection is removed when the [`ConnectionGuard`] is dropped.
    pub fn connect_guarded<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Rc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns [`SignalError::InvalidConnection`] if the ID is unknown or
    /// was already disconnected.
    pub fn disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        match self.connections.borrow_mut().remove(id) {
            Some(_) => Ok(()),
            None => Err(SignalError::InvalidConnection),
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.borrow_mut().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// Returns `true` if no slots are connected.
    pub fn is_empty(&self) -> bool {
        self.connections.borrow().is_empty()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. This is useful during
    /// initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing. The slot list is
    /// snapshotted before the first invocation, so slots may connect or
    /// disconnect during dispatch without invalidating the iteration.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "quaver_core::signal", "signal blocked, skipping emit");
            return;
        }

        // Snapshot under the borrow, invoke outside it: slots are allowed
        // to call back into this signal.
        let slots: Vec<Rc<dyn Fn(&Args)>> = self
            .connections
            .borrow()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();

        tracing::trace!(
            target: "quaver_core::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}

/// RAII guard for a signal connection.
///
/// Dropping the guard disconnects the slot. If the signal itself has already
/// been dropped, the guard's drop is a no-op.
pub struct ConnectionGuard<Args> {
    connections: Weak<RefCell<ConnectionMap<Args>>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Detach the guard, leaving the connection alive.
    pub fn detach(mut self) -> ConnectionId {
        self.connections = Weak::new();
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(connections) = self.connections.upgrade() {
            connections.borrow_mut().remove(self.id);
        }
    }
}

// The widget layer is single-threaded; sharing a signal across threads is a
// bug, not a feature.
static_assertions::assert_not_impl_any!(Signal<()>: Send, Sync);
