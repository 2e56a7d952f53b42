// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded observer signals.
//!
//! Disconnecting a receiver only tombstones its slot. Tombstones are swept in
//! one pass, either explicitly via [`Signal::sweep`] or lazily at the start of
//! the next [`Signal::emit`], so a burst of connect/disconnect calls within one
//! event dispatch costs a single cleanup.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

type Callback<A> = Rc<dyn Fn(&A)>;

struct Slot<A> {
    id: u64,
    callback: Option<Callback<A>>,
}

/// Handle returned by [`Signal::connect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection(u64);

/// A list of receivers invoked with a shared argument.
pub struct Signal<A> {
    slots: RefCell<SmallVec<[Slot<A>; 4]>>,
    next_id: Cell<u64>,
    stale: Cell<usize>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(SmallVec::new()),
            next_id: Cell::new(0),
            stale: Cell::new(0),
        }
    }
}

impl<A> Signal<A> {
    /// Creates a signal with no receivers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a receiver.
    pub fn connect(&self, callback: impl Fn(&A) + 'static) -> Connection {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.slots.borrow_mut().push(Slot {
            id,
            callback: Some(Rc::new(callback)),
        });
        Connection(id)
    }

    /// Disconnects a receiver.
    ///
    /// Returns `false` if the connection was already gone.
    pub fn disconnect(&self, connection: Connection) -> bool {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.iter_mut().find(|s| s.id == connection.0) else {
            return false;
        };
        if slot.callback.take().is_some() {
            self.stale.set(self.stale.get() + 1);
            true
        } else {
            false
        }
    }

    /// Returns `true` if `connection` still has a live receiver.
    #[must_use]
    pub fn is_connected(&self, connection: Connection) -> bool {
        self.slots
            .borrow()
            .iter()
            .any(|s| s.id == connection.0 && s.callback.is_some())
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.slots.borrow().len() - self.stale.get()
    }

    /// Number of tombstoned slots awaiting [`Signal::sweep`].
    #[must_use]
    #[inline]
    pub fn pending_cleanup(&self) -> usize {
        self.stale.get()
    }

    /// Drops tombstoned slots. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let stale = self.stale.replace(0);
        if stale > 0 {
            self.slots.borrow_mut().retain(|s| s.callback.is_some());
        }
        stale
    }

    /// Invokes every live receiver in connection order.
    ///
    /// Receivers may connect or disconnect (including themselves) while the
    /// signal is emitting. Receivers added during an emission are not called
    /// until the next one; receivers removed during it are skipped.
    pub fn emit(&self, args: &A) {
        self.sweep();
        let snapshot: SmallVec<[(u64, Callback<A>); 4]> = self
            .slots
            .borrow()
            .iter()
            .filter_map(|s| s.callback.clone().map(|cb| (s.id, cb)))
            .collect();
        for (id, callback) in snapshot {
            if self.is_connected(Connection(id)) {
                callback(args);
            }
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_count())
            .field("pending_cleanup", &self.stale.get())
            .finish_non_exhaustive()
    }
}
