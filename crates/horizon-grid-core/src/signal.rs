//! Signal/slot system for Horizon Grid.
//!
//! A grid lives inside one request of one user, so every slot is invoked
//! directly on the emitting thread. There is no queued delivery.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let action = Signal::<String>::new();
//! let conn_id = action.connect(|name| {
//!     println!("Action: {}", name);
//! });
//!
//! action.emit("delete".to_string());
//! action.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle of one connected slot, returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of listeners for one kind of grid event.
///
/// Emitting calls every connected slot in connection order with a reference
/// to the event.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// Creates a signal with no listeners.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Adds a listener.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Removes every listener.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of listeners.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppresses (or resumes) emission.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Returns `true` while emission is suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Calls every listener with `args`.
    ///
    /// The listener list is copied before the first call, so a listener may
    /// connect or disconnect on this signal without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::COMMAND, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::COMMAND, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }
}
