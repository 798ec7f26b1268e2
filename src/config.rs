//! # Notifier configuration.
//!
//! Provides [`Config`], the settings a [`Notifier`](crate::Notifier) is built from,
//! and [`DeliveryMode`], which selects who runs subscriber callbacks.
//!
//! ## Delivery modes
//! ```text
//! Inline (default):
//!   post()/register() ──► enqueue under lock ──► drain on caller thread ──► on_item()
//!
//! Worker:
//!   post()/register() ──► enqueue under lock ──► wake worker task ──► on_item()
//!                                                  (one per subscriber)
//! ```

/// Who executes subscriber callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Callbacks run on the thread that posted or registered, before the call returns.
    ///
    /// If a subscriber's queue is already being drained (by another thread, or by an
    /// outer frame when a callback posts reentrantly), the item is left to that drainer.
    #[default]
    Inline,
    /// Each subscriber gets a dedicated tokio task that drains its queue in FIFO order.
    ///
    /// Posting never runs subscriber code. Use [`Notifier::flush`](crate::Notifier::flush)
    /// to wait for queued deliveries.
    Worker,
}

/// Configuration for a notifier.
///
/// ## Field semantics
/// - `label`: name used in log records for this notifier
/// - `delivery`: see [`DeliveryMode`]
/// - `catch_panics`: convert subscriber panics into [`DeliveryError::Panicked`](crate::DeliveryError::Panicked)
///   instead of unwinding through the notifier
#[derive(Clone, Debug)]
pub struct Config {
    /// Notifier name used in logs.
    pub label: String,

    /// Delivery strategy.
    pub delivery: DeliveryMode,

    /// Whether subscriber panics are caught and reported as delivery failures.
    ///
    /// When `false` in inline mode, a panicking subscriber unwinds into the caller of
    /// `post`; notifier state stays consistent but the remaining fan-out is skipped.
    pub catch_panics: bool,
}

impl Config {
    /// Returns a copy with the given label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns a copy with the given delivery mode.
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `label = "notifier"`
    /// - `delivery = DeliveryMode::Inline`
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            label: "notifier".to_string(),
            delivery: DeliveryMode::Inline,
            catch_panics: true,
        }
    }
}
