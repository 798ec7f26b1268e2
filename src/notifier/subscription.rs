//! # Subscription token.
//!
//! A [`Subscription`] is returned by [`Notifier::register`](crate::Notifier::register)
//! and is the only handle that can remove the registration from the roster.
//!
//! ## Rules
//! - `release()` removes at most one roster entry; later calls are no-ops.
//! - Dropping the owning token releases it, so a discarded token never leaves a
//!   stale roster entry behind.
//! - Registering an already-registered subscriber yields an *alias*: it can
//!   release the membership explicitly, but dropping it changes nothing.
//! - The token holds the notifier weakly; it does not keep the notifier alive.
//! - Releasing does not touch the subscriber's own state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::core::{Notifier, Shared};
use super::roster::EntryId;

/// Capability handle for one roster membership.
#[must_use = "dropping a Subscription unregisters the subscriber"]
pub struct Subscription {
    notifier: Weak<Shared>,
    entry: EntryId,
    released: AtomicBool,
    /// Only the token that created the membership releases it on drop.
    owner: bool,
}

impl Subscription {
    pub(crate) fn new(notifier: &Arc<Shared>, entry: EntryId) -> Self {
        Self {
            notifier: Arc::downgrade(notifier),
            entry,
            released: AtomicBool::new(false),
            owner: true,
        }
    }

    /// A non-owning token for a membership created by an earlier registration.
    pub(crate) fn alias(notifier: &Arc<Shared>, entry: EntryId) -> Self {
        Self {
            notifier: Arc::downgrade(notifier),
            entry,
            released: AtomicBool::new(false),
            owner: false,
        }
    }

    /// A token that is already spent; returned when registering with a completed notifier.
    pub(crate) fn spent(notifier: &Arc<Shared>, entry: EntryId) -> Self {
        Self {
            notifier: Arc::downgrade(notifier),
            entry,
            released: AtomicBool::new(true),
            owner: true,
        }
    }

    /// Registration id this token is bound to.
    pub fn id(&self) -> u64 {
        self.entry
    }

    /// Removes the bound subscriber from the notifier's roster.
    ///
    /// Returns `true` if this call removed an entry. Releasing twice, releasing
    /// after the notifier was dropped, or releasing after the subscriber was
    /// evicted all return `false` and change nothing.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        match self.notifier.upgrade() {
            Some(shared) => shared.unregister(self.entry),
            None => false,
        }
    }

    /// `true` while the bound registration is still on the roster.
    pub fn is_active(&self) -> bool {
        if self.released.load(Ordering::Acquire) {
            return false;
        }
        self.notifier
            .upgrade()
            .is_some_and(|shared| shared.is_registered(self.entry))
    }

    /// `true` if this token created the membership it is bound to.
    ///
    /// Alias tokens come from registering an already-registered subscriber.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    /// `true` if this token was issued by `notifier`.
    pub fn is_bound_to(&self, notifier: &Notifier) -> bool {
        std::ptr::eq(self.notifier.as_ptr(), notifier.shared_ptr())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.owner {
            self.release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("entry", &self.entry)
            .field("released", &self.released.load(Ordering::Relaxed))
            .field("owner", &self.owner)
            .finish()
    }
}
