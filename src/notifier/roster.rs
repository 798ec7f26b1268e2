//! # Roster entries and per-subscriber delivery queues.
//!
//! Every registration owns one [`Entry`]: the subscriber handle plus a FIFO
//! queue of pending [`Signal`]s. The notifier pushes into the queue while it
//! holds its state lock; callbacks run later, from the queue, without that lock.
//!
//! ## Queue states
//! ```text
//!            push(Item)                    push(Completed)
//!   open ─────────────────► open ─────────────────────────► sealed
//!     │                                                        │
//!     └──────── close() (release / eviction) ◄─────────────────┘
//!                           closed: pending dropped, pushes refused
//! ```
//!
//! ## Inline draining
//! At most one drainer per entry at a time (`draining` flag). A caller that finds
//! the flag set leaves its items to the active drainer; the drainer clears the
//! flag only under the queue lock after observing an empty queue, so no item is
//! stranded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, Notify};

use crate::items::ItemRef;
use crate::subscribers::Subscribe;

/// Identifier of one registration. Never reused within a process.
pub(crate) type EntryId = u64;

/// Pointer identity of a subscriber instance.
pub(crate) type SubscriberKey = usize;

/// Returns the identity key used for duplicate registration checks.
pub(crate) fn subscriber_key(sub: &Arc<dyn Subscribe>) -> SubscriberKey {
    Arc::as_ptr(sub) as *const () as usize
}

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// None of the crate's critical sections run user code, so a poisoned lock
/// still guards consistent data.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A unit of work queued for one subscriber.
pub(crate) enum Signal {
    /// Deliver an item via `on_item`.
    Item(ItemRef),
    /// Deliver `on_completed`, then close the entry.
    Completed,
    /// Worker mode barrier: answered once everything queued before it was handled.
    Flush(oneshot::Sender<()>),
}

#[derive(Default)]
struct Queue {
    pending: VecDeque<Signal>,
    draining: bool,
    sealed: bool,
    closed: bool,
}

/// One roster membership.
pub(crate) struct Entry {
    pub(crate) id: EntryId,
    pub(crate) key: SubscriberKey,
    pub(crate) subscriber: Arc<dyn Subscribe>,
    queue: Mutex<Queue>,
    /// Set in worker mode; pinged on every push and on close.
    wake: Option<Arc<Notify>>,
}

/// What a worker should do next.
pub(crate) enum Next {
    Signal(Signal),
    Idle,
    Closed,
}

impl Entry {
    pub(crate) fn new(id: EntryId, subscriber: Arc<dyn Subscribe>, wake: Option<Arc<Notify>>) -> Self {
        Self {
            id,
            key: subscriber_key(&subscriber),
            subscriber,
            queue: Mutex::new(Queue::default()),
            wake,
        }
    }

    /// Subscriber name for logs.
    pub(crate) fn name(&self) -> &str {
        self.subscriber.name()
    }

    /// Enqueues a signal. Returns `false` if the entry refuses it.
    ///
    /// Closed entries refuse everything; sealed entries only accept flush barriers.
    pub(crate) fn push(&self, signal: Signal) -> bool {
        {
            let mut q = lock(&self.queue);
            if q.closed {
                return false;
            }
            match signal {
                Signal::Flush(_) => {}
                Signal::Completed => {
                    if q.sealed {
                        return false;
                    }
                    q.sealed = true;
                }
                Signal::Item(_) => {
                    if q.sealed {
                        return false;
                    }
                }
            }
            q.pending.push_back(signal);
        }
        if let Some(wake) = &self.wake {
            wake.notify_one();
        }
        true
    }

    /// Stops all further delivery and drops whatever is still pending.
    pub(crate) fn close(&self) {
        let dropped = {
            let mut q = lock(&self.queue);
            q.closed = true;
            std::mem::take(&mut q.pending)
        };
        drop(dropped);
        if let Some(wake) = &self.wake {
            wake.notify_one();
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        lock(&self.queue).closed
    }

    /// Claims the inline drainer role. `None` if someone else holds it or the entry is closed.
    pub(crate) fn begin_drain(&self) -> Option<Drain<'_>> {
        let mut q = lock(&self.queue);
        if q.draining || q.closed {
            return None;
        }
        q.draining = true;
        Some(Drain {
            entry: self,
            finished: false,
        })
    }

    /// Pops the next signal for a worker task.
    pub(crate) fn next_queued(&self) -> Next {
        let mut q = lock(&self.queue);
        if q.closed {
            return Next::Closed;
        }
        match q.pending.pop_front() {
            Some(sig) => Next::Signal(sig),
            None => Next::Idle,
        }
    }
}

/// Inline drainer role for one entry; releases the role on drop, including on unwind.
pub(crate) struct Drain<'a> {
    entry: &'a Entry,
    finished: bool,
}

impl Drain<'_> {
    /// Pops the next signal, or gives up the drainer role when the queue is empty.
    pub(crate) fn next_signal(&mut self) -> Option<Signal> {
        let mut q = lock(&self.entry.queue);
        let next = if q.closed {
            None
        } else {
            q.pending.pop_front()
        };
        if next.is_none() {
            q.draining = false;
            self.finished = true;
        }
        next
    }
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        if !self.finished {
            lock(&self.entry.queue).draining = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::items::Item;

    struct Nop;

    impl Subscribe for Nop {
        fn on_item(&self, _item: &Item) -> Result<(), DeliveryError> {
            Ok(())
        }
        fn on_error(&self, _error: &DeliveryError) {}
    }

    fn entry() -> Entry {
        Entry::new(1, Arc::new(Nop), None)
    }

    fn item(id: i64) -> Signal {
        Signal::Item(Arc::new(Item::new(id, "h", "b")))
    }

    #[test]
    fn single_drainer_at_a_time() {
        let e = entry();
        assert!(e.push(item(1)));
        let mut d = e.begin_drain().expect("first drainer");
        assert!(e.begin_drain().is_none());
        assert!(matches!(d.next_signal(), Some(Signal::Item(_))));
        assert!(d.next_signal().is_none());
        drop(d);
        assert!(e.begin_drain().is_some());
    }

    #[test]
    fn drain_role_released_when_dropped_early() {
        let e = entry();
        e.push(item(1));
        e.push(item(2));
        {
            let mut d = e.begin_drain().expect("drainer");
            let _ = d.next_signal();
        }
        let mut d = e.begin_drain().expect("role released");
        assert!(matches!(d.next_signal(), Some(Signal::Item(i)) if i.id() == 2));
    }

    #[test]
    fn sealed_entry_refuses_items_but_accepts_flush() {
        let e = entry();
        assert!(e.push(Signal::Completed));
        assert!(!e.push(item(1)));
        assert!(!e.push(Signal::Completed));
        let (tx, _rx) = oneshot::channel();
        assert!(e.push(Signal::Flush(tx)));
    }

    #[test]
    fn close_drops_pending_and_refuses_pushes() {
        let e = entry();
        e.push(item(1));
        e.close();
        assert!(e.is_closed());
        assert!(!e.push(item(2)));
        assert!(e.begin_drain().is_none());
        assert!(matches!(e.next_queued(), Next::Closed));
    }
}
