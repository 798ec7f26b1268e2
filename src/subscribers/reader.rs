//! # Reader: a subscriber that keeps a local projection.
//!
//! [`Reader`] renders every item it receives into a `Vec<String>` and holds its
//! own [`Subscription`], so it can subscribe and unsubscribe itself.
//!
//! ## State machine (per notifier)
//! ```text
//!   Unsubscribed ── subscribe(n) ──► Subscribed   (replay appended to projection)
//!        ▲                              │  ▲
//!        │                              └──┘ on_item (live posts)
//!        └──────── unsubscribe() ───────┘    (token released, projection cleared)
//! ```
//!
//! Subscribing to a different notifier while subscribed releases the old token
//! and clears the projection first. Subscribing again to the same notifier is a no-op.
//!
//! A rendering that is still in flight when the subscription ends is dropped:
//! `on_item` only appends if the projection has not been cleared since the
//! delivery started.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::error;

use crate::error::{DeliveryError, SubscriberError};
use crate::items::{self, Item};
use crate::notifier::lock;
use crate::notifier::{Notifier, Subscription};
use crate::subscribers::Subscribe;

/// Pure item-to-text function used to build a projection.
pub type Renderer = fn(&Item) -> String;

#[derive(Default)]
struct Projection {
    lines: Vec<String>,
    /// Set while a subscription is held; cleared with `lines`.
    live: bool,
    /// Bumped on every clear so a delivery that straddles one is discarded.
    epoch: u64,
}

impl Projection {
    fn reset(&mut self, live: bool) {
        self.lines.clear();
        self.live = live;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

/// Named subscriber with a rendered, ordered projection of received items.
///
/// # Example
/// ```
/// use herald::{Item, Notifier, Reader};
///
/// let n = Notifier::new();
/// let reader = Reader::with_renderer("Headlines", |i| i.headline().to_uppercase()).unwrap();
/// reader.subscribe(&n);
/// n.post(Item::new(1, "storm ahead", "..."));
/// assert_eq!(reader.projection(), vec!["STORM AHEAD"]);
///
/// assert!(Reader::new("   ").is_err());
/// ```
pub struct Reader {
    name: Arc<str>,
    render: Renderer,
    projection: Mutex<Projection>,
    subscription: Mutex<Option<Subscription>>,
    last_error: Mutex<Option<DeliveryError>>,
}

impl Reader {
    /// Creates a reader using the default `id;headline;body` rendering.
    ///
    /// # Errors
    /// [`SubscriberError::InvalidArgument`] if `name` is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Result<Arc<Self>, SubscriberError> {
        Self::with_renderer(name, items::render)
    }

    /// Creates a reader with a custom renderer.
    ///
    /// # Errors
    /// [`SubscriberError::InvalidArgument`] if `name` is empty or only whitespace.
    pub fn with_renderer(
        name: impl Into<String>,
        render: Renderer,
    ) -> Result<Arc<Self>, SubscriberError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubscriberError::InvalidArgument {
                field: "name",
                reason: "must not be empty",
            });
        }
        Ok(Arc::new(Self {
            name: Arc::from(name),
            render,
            projection: Mutex::new(Projection::default()),
            subscription: Mutex::new(None),
            last_error: Mutex::new(None),
        }))
    }

    /// Registers with `notifier` and keeps the returned token.
    ///
    /// The notifier's log is replayed into the projection before this returns
    /// (inline delivery).
    pub fn subscribe(self: &Arc<Self>, notifier: &Notifier) {
        // Held across `register` so concurrent calls cannot both own a token.
        let mut slot = lock(&self.subscription);
        if let Some(prev) = slot.as_ref() {
            if prev.is_bound_to(notifier) && prev.is_active() {
                return;
            }
        }
        if let Some(prev) = slot.take() {
            prev.release();
        }
        lock(&self.projection).reset(true);
        *lock(&self.last_error) = None;

        let me: Arc<dyn Subscribe> = Arc::clone(self) as Arc<dyn Subscribe>;
        *slot = Some(notifier.register(me));
    }

    /// Releases the held token and clears the projection.
    ///
    /// # Errors
    /// [`SubscriberError::InvalidState`] if no subscription is held.
    pub fn unsubscribe(&self) -> Result<(), SubscriberError> {
        let token = lock(&self.subscription)
            .take()
            .ok_or(SubscriberError::InvalidState {
                reason: "not subscribed",
            })?;
        token.release();
        lock(&self.projection).reset(false);
        Ok(())
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the rendered items received since the last subscription.
    pub fn projection(&self) -> Vec<String> {
        lock(&self.projection).lines.clone()
    }

    /// `true` while the held token is on its notifier's roster.
    pub fn is_subscribed(&self) -> bool {
        lock(&self.subscription)
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// The failure that ended the most recent subscription, if any.
    pub fn last_error(&self) -> Option<DeliveryError> {
        lock(&self.last_error).clone()
    }
}

impl Subscribe for Reader {
    fn on_item(&self, item: &Item) -> Result<(), DeliveryError> {
        let epoch = {
            let p = lock(&self.projection);
            if !p.live {
                return Ok(());
            }
            p.epoch
        };
        let line = (self.render)(item);
        let mut p = lock(&self.projection);
        if p.live && p.epoch == epoch {
            p.lines.push(line);
        }
        Ok(())
    }

    fn on_completed(&self) {
        lock(&self.projection).reset(false);
    }

    fn on_error(&self, err: &DeliveryError) {
        error!(reader = %self.name, error = err.as_label(), "subscription failed: {err}");
        *lock(&self.last_error) = Some(err.clone());
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.name)
            .field("projection", &lock(&self.projection).lines.len())
            .field("subscription", &*lock(&self.subscription))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn slow_render(item: &Item) -> String {
        thread::sleep(Duration::from_millis(200));
        items::render(item)
    }

    #[test]
    fn rejects_empty_name() {
        let err = Reader::new("").unwrap_err();
        assert_eq!(err.as_label(), "subscriber_invalid_argument");
        assert!(Reader::new(" \t").is_err());
        assert_eq!(Reader::new("Daily").unwrap().name(), "Daily");
    }

    #[test]
    fn unsubscribe_without_token_is_invalid_state() {
        let r = Reader::new("Daily").unwrap();
        assert_eq!(
            r.unsubscribe(),
            Err(SubscriberError::InvalidState {
                reason: "not subscribed"
            })
        );
    }

    #[test]
    fn unsubscribe_twice_fails_second_time() {
        let n = Notifier::new();
        let r = Reader::new("Daily").unwrap();
        r.subscribe(&n);
        assert!(r.unsubscribe().is_ok());
        assert!(r.unsubscribe().is_err());
    }

    #[test]
    fn resubscribe_same_notifier_is_noop() {
        let n = Notifier::new();
        n.post(Item::new(1, "a", "b"));
        let r = Reader::new("Daily").unwrap();
        r.subscribe(&n);
        r.subscribe(&n);
        assert_eq!(r.projection(), vec!["1;a;b"]);
        assert_eq!(n.subscriber_count(), 1);
        n.post(Item::new(2, "c", "d"));
        assert_eq!(r.projection(), vec!["1;a;b", "2;c;d"]);
    }

    #[test]
    fn switching_notifier_releases_old_membership() {
        let first = Notifier::new();
        let second = Notifier::new();
        first.post(Item::new(1, "first", "x"));
        second.post(Item::new(9, "second", "y"));

        let r = Reader::new("Daily").unwrap();
        r.subscribe(&first);
        r.subscribe(&second);

        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);
        assert_eq!(r.projection(), vec!["9;second;y"]);

        first.post(Item::new(2, "late", "z"));
        assert_eq!(r.projection(), vec!["9;second;y"]);
    }

    #[test]
    fn completion_clears_projection() {
        let n = Notifier::new();
        let r = Reader::new("Daily").unwrap();
        r.subscribe(&n);
        n.post(Item::new(1, "a", "b"));
        assert_eq!(r.projection().len(), 1);
        assert!(n.complete());
        assert!(r.projection().is_empty());
        assert!(!r.is_subscribed());
        // token is held but spent; unsubscribing still succeeds
        assert!(r.unsubscribe().is_ok());
    }

    #[test]
    fn unsubscribe_discards_rendering_in_flight() {
        let n = Notifier::new();
        let r = Reader::with_renderer("Slow", slow_render).unwrap();
        r.subscribe(&n);

        let poster = {
            let n = n.clone();
            thread::spawn(move || n.post(Item::new(1, "a", "b")))
        };
        thread::sleep(Duration::from_millis(50));
        r.unsubscribe().unwrap();
        assert!(poster.join().unwrap());

        assert!(r.projection().is_empty());
        assert!(!r.is_subscribed());
    }

    #[test]
    fn resubscribe_after_unsubscribe_receives_replay() {
        let n = Notifier::new();
        n.post(Item::new(1, "a", "b"));
        let r = Reader::new("Daily").unwrap();
        r.subscribe(&n);
        r.unsubscribe().unwrap();
        r.subscribe(&n);
        n.post(Item::new(2, "c", "d"));
        assert_eq!(r.projection(), vec!["1;a;b", "2;c;d"]);
    }
}
