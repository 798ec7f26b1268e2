//! # Notifier: append-only log, roster and fan-out.
//!
//! ## Architecture
//! ```text
//! register(S) ─┐                        ┌──► [queue S1] ──► S1.on_item()
//!              ├─► lock { log, roster } ┼──► [queue S2] ──► S2.on_item()
//! post(item) ──┘                        └──► [queue SN] ──► SN.on_item()
//!                  (enqueue only)            (inline drain or worker task)
//! ```
//!
//! ## Rules
//! - The log never holds two items with the same id; non-positive ids are ignored.
//! - Replay of the log and insertion into the roster happen in one critical
//!   section, so an item posted concurrently is seen exactly once by a new subscriber.
//! - Subscriber callbacks never run while the state lock is held.
//! - A failing subscriber is told via `on_error` and evicted; the rest of the
//!   fan-out continues.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::{oneshot, Notify};
use tracing::{debug, warn};

use crate::config::{Config, DeliveryMode};
use crate::error::{panic_message, ConfigError, DeliveryError};
use crate::items::{Item, ItemRef};
use crate::subscribers::Subscribe;

use super::roster::{lock, Entry, EntryId, Signal};
use super::subscription::Subscription;
use super::worker;

/// Process-wide registration counter; ids are unique across notifiers.
static ENTRY_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct State {
    log: Vec<ItemRef>,
    ids: HashSet<i64>,
    roster: Vec<Arc<Entry>>,
    /// Worker mode only: entries sent `Completed` that may still be draining.
    retiring: Vec<Arc<Entry>>,
    completed: bool,
}

/// State shared by every `Notifier` handle, its tokens (weakly) and its workers (weakly).
pub(crate) struct Shared {
    cfg: Config,
    runtime: Option<Handle>,
    state: Mutex<State>,
}

/// # Publisher owning the item log and subscriber roster.
///
/// Cheap to clone: clones are handles to the same notifier.
///
/// # Example
/// ```
/// use herald::{Item, Notifier, Reader};
///
/// let notifier = Notifier::new();
/// notifier.post(Item::new(1, "First", "..."));
///
/// let reader = Reader::new("Evening Post").unwrap();
/// reader.subscribe(&notifier);
/// notifier.post(Item::new(2, "Second", "..."));
///
/// assert_eq!(reader.projection(), vec!["1;First;...", "2;Second;..."]);
///
/// reader.unsubscribe().unwrap();
/// assert!(reader.projection().is_empty());
/// ```
#[derive(Clone)]
pub struct Notifier {
    shared: Arc<Shared>,
}

impl Notifier {
    /// Creates an inline-delivery notifier with default configuration.
    pub fn new() -> Self {
        Self::from_parts(Config::default(), None)
    }

    /// Creates a notifier from an explicit configuration.
    ///
    /// # Errors
    /// [`ConfigError::RuntimeUnavailable`] if `cfg.delivery` is [`DeliveryMode::Worker`]
    /// and this is not called from within a tokio runtime.
    pub fn with_config(cfg: Config) -> Result<Self, ConfigError> {
        let runtime = match cfg.delivery {
            DeliveryMode::Inline => None,
            DeliveryMode::Worker => Some(Handle::try_current()?),
        };
        Ok(Self::from_parts(cfg, runtime))
    }

    fn from_parts(cfg: Config, runtime: Option<Handle>) -> Self {
        Self {
            shared: Arc::new(Shared {
                cfg,
                runtime,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Registers a subscriber and replays the log to it.
    ///
    /// - Already on the roster (same `Arc` instance): returns an alias token for
    ///   the existing membership; nothing is replayed or re-added, and dropping
    ///   the alias leaves the membership in place.
    /// - Otherwise every logged item is queued for the subscriber in log order,
    ///   the subscriber joins the roster, and the replay is delivered.
    /// - On a completed notifier the replay is followed by `on_completed` and
    ///   the returned token is already inactive.
    ///
    /// Dropping the returned owning token unregisters the subscriber.
    pub fn register(&self, subscriber: Arc<dyn Subscribe>) -> Subscription {
        let shared = &self.shared;
        let key = super::roster::subscriber_key(&subscriber);

        let (entry, completed) = {
            let mut st = lock(&shared.state);
            if let Some(existing) = st.roster.iter().find(|e| e.key == key) {
                debug!(
                    notifier = %shared.cfg.label,
                    subscriber = existing.name(),
                    entry = existing.id,
                    "subscriber already registered"
                );
                return Subscription::alias(shared, existing.id);
            }

            let id = ENTRY_SEQ.fetch_add(1, Ordering::Relaxed);
            let wake = shared.runtime.as_ref().map(|_| Arc::new(Notify::new()));
            let entry = Arc::new(Entry::new(id, subscriber, wake.clone()));
            for item in &st.log {
                entry.push(Signal::Item(Arc::clone(item)));
            }
            if st.completed {
                entry.push(Signal::Completed);
                if shared.runtime.is_some() {
                    st.retiring.push(Arc::clone(&entry));
                }
            } else {
                st.roster.push(Arc::clone(&entry));
            }

            if let (Some(rt), Some(wake)) = (&shared.runtime, wake) {
                worker::spawn(rt, Arc::downgrade(shared), Arc::clone(&entry), wake);
            }

            debug!(
                notifier = %shared.cfg.label,
                subscriber = entry.name(),
                entry = id,
                replay = st.log.len(),
                "subscriber registered"
            );
            (entry, st.completed)
        };

        shared.drain(&entry);

        if completed {
            Subscription::spent(shared, entry.id)
        } else {
            Subscription::new(shared, entry.id)
        }
    }

    /// Appends an item to the log and delivers it to every current subscriber.
    ///
    /// Returns `false` without any effect when the id is not positive, the id is
    /// already logged, or the notifier has completed.
    pub fn post(&self, item: Item) -> bool {
        let shared = &self.shared;
        if !item.is_postable() {
            debug!(notifier = %shared.cfg.label, item = item.id(), "ignored non-positive id");
            return false;
        }

        let targets = {
            let mut st = lock(&shared.state);
            if st.completed {
                debug!(notifier = %shared.cfg.label, item = item.id(), "ignored post after completion");
                return false;
            }
            if !st.ids.insert(item.id()) {
                debug!(notifier = %shared.cfg.label, item = item.id(), "ignored duplicate id");
                return false;
            }

            let item: ItemRef = Arc::new(item);
            st.log.push(Arc::clone(&item));
            for entry in &st.roster {
                entry.push(Signal::Item(Arc::clone(&item)));
            }
            debug!(
                notifier = %shared.cfg.label,
                item = item.id(),
                fanout = st.roster.len(),
                "item posted"
            );
            st.roster.clone()
        };

        for entry in &targets {
            shared.drain(entry);
        }
        true
    }

    /// Signals completion to every subscriber and closes the notifier.
    ///
    /// Each roster member receives `on_completed` after its pending items; the
    /// roster is emptied. Later posts are ignored. Returns `false` if the
    /// notifier had already completed.
    pub fn complete(&self) -> bool {
        let shared = &self.shared;
        let targets = {
            let mut st = lock(&shared.state);
            if st.completed {
                return false;
            }
            st.completed = true;
            let roster = std::mem::take(&mut st.roster);
            for entry in &roster {
                entry.push(Signal::Completed);
            }
            if shared.runtime.is_some() {
                st.retiring.extend(roster.iter().cloned());
            }
            debug!(notifier = %shared.cfg.label, subscribers = roster.len(), "notifier completed");
            roster
        };

        for entry in &targets {
            shared.drain(entry);
        }
        true
    }

    /// Waits until every delivery queued before this call has been handled.
    ///
    /// Returns immediately in inline mode, where deliveries finish before
    /// `post`/`register` return (unless another drainer holds the queue).
    pub async fn flush(&self) {
        if self.shared.runtime.is_none() {
            return;
        }
        let barriers: Vec<oneshot::Receiver<()>> = {
            let mut st = lock(&self.shared.state);
            st.retiring.retain(|e| !e.is_closed());
            st.roster
                .iter()
                .chain(st.retiring.iter())
                .filter_map(|entry| {
                    let (tx, rx) = oneshot::channel();
                    entry.push(Signal::Flush(tx)).then_some(rx)
                })
                .collect()
        };
        // A dropped barrier means the entry closed first; nothing left to wait for.
        let _ = futures::future::join_all(barriers).await;
    }

    /// Number of logged items.
    pub fn len(&self) -> usize {
        lock(&self.shared.state).log.len()
    }

    /// `true` if nothing has been posted.
    pub fn is_empty(&self) -> bool {
        lock(&self.shared.state).log.is_empty()
    }

    /// Snapshot of the log in post order.
    pub fn items(&self) -> Vec<ItemRef> {
        lock(&self.shared.state).log.clone()
    }

    /// `true` if an item with this id has been logged.
    pub fn contains(&self, id: i64) -> bool {
        lock(&self.shared.state).ids.contains(&id)
    }

    /// Number of subscribers currently on the roster.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.state).roster.len()
    }

    /// `true` once [`complete`](Self::complete) has been called.
    pub fn is_completed(&self) -> bool {
        lock(&self.shared.state).completed
    }

    /// Name used for this notifier in logs.
    pub fn label(&self) -> &str {
        &self.shared.cfg.label
    }

    pub(crate) fn shared_ptr(&self) -> *const Shared {
        Arc::as_ptr(&self.shared)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = lock(&self.shared.state);
        f.debug_struct("Notifier")
            .field("label", &self.shared.cfg.label)
            .field("delivery", &self.shared.cfg.delivery)
            .field("items", &st.log.len())
            .field("subscribers", &st.roster.len())
            .field("completed", &st.completed)
            .finish()
    }
}

impl Shared {
    /// Removes a registration from the roster and stops its queue.
    pub(crate) fn unregister(&self, id: EntryId) -> bool {
        let removed = {
            let mut st = lock(&self.state);
            st.roster
                .iter()
                .position(|e| e.id == id)
                .map(|pos| st.roster.remove(pos))
        };
        match removed {
            Some(entry) => {
                entry.close();
                debug!(
                    notifier = %self.cfg.label,
                    subscriber = entry.name(),
                    entry = id,
                    "subscriber unregistered"
                );
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_registered(&self, id: EntryId) -> bool {
        lock(&self.state).roster.iter().any(|e| e.id == id)
    }

    /// Inline mode: deliver everything queued for `entry` on this thread.
    ///
    /// No-op in worker mode or when another drainer is active for the entry.
    fn drain(&self, entry: &Arc<Entry>) {
        if self.runtime.is_some() {
            return;
        }
        let Some(mut drain) = entry.begin_drain() else {
            return;
        };
        while let Some(signal) = drain.next_signal() {
            self.deliver(entry, signal);
        }
    }

    /// Runs one queued signal against the subscriber.
    pub(crate) fn deliver(&self, entry: &Entry, signal: Signal) {
        match signal {
            Signal::Item(item) => {
                if let Err(err) = self.call_on_item(entry, &item) {
                    self.fail(entry, err);
                }
            }
            Signal::Completed => {
                entry.subscriber.on_completed();
                entry.close();
            }
            Signal::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    fn call_on_item(&self, entry: &Entry, item: &Item) -> Result<(), DeliveryError> {
        let sub = &entry.subscriber;
        if !self.cfg.catch_panics {
            return sub.on_item(item);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| sub.on_item(item))) {
            Ok(res) => res,
            Err(payload) => Err(DeliveryError::Panicked {
                subscriber: Arc::from(sub.name()),
                item_id: item.id(),
                info: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Reports a delivery failure to the subscriber and evicts it.
    fn fail(&self, entry: &Entry, err: DeliveryError) {
        warn!(
            notifier = %self.cfg.label,
            subscriber = entry.name(),
            entry = entry.id,
            item = err.item_id(),
            error = err.as_label(),
            "delivery failed; evicting subscriber: {err}"
        );
        self.unregister(entry.id);
        // Eviction closes the queue, so nothing more reaches the subscriber after `on_error`.
        entry.close();
        entry.subscriber.on_error(&err);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let st = match self.state.get_mut() {
            Ok(st) => st,
            Err(poisoned) => poisoned.into_inner(),
        };
        for entry in st.roster.drain(..).chain(st.retiring.drain(..)) {
            entry.close();
        }
    }
}
