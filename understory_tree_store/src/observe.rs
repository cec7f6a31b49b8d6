// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification: listener registry and subscription guards.

use core::cell::RefCell;
use core::fmt;

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

type Listener<S> = Box<dyn FnMut(&S)>;

/// Registered listeners, keyed by a monotonically increasing id.
pub(crate) struct Listeners<S> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S> Listeners<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn notify(&mut self, state: &S) {
        for (_, listener) in &mut self.entries {
            listener(state);
        }
    }

    fn insert(&mut self, listener: Listener<S>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry, _)| *entry != id);
    }
}

/// Adds `listener` to the shared registry and returns its guard.
pub(crate) fn subscribe<S: 'static>(
    registry: &Rc<RefCell<Listeners<S>>>,
    listener: Listener<S>,
) -> Subscription {
    let id = registry.borrow_mut().insert(listener);
    let weak: Weak<RefCell<Listeners<S>>> = Rc::downgrade(registry);
    Subscription {
        cancel: Some(Box::new(move || {
            if let Some(registry) = weak.upgrade()
                && let Ok(mut listeners) = registry.try_borrow_mut()
            {
                listeners.remove(id);
            }
        })),
    }
}

/// Keeps a listener registered with a [`TreeStore`](crate::TreeStore).
///
/// Dropping the guard unsubscribes. Use [`Subscription::detach`] to keep the
/// listener for the lifetime of the store instead.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribes now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keeps the listener registered until the store is dropped.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
