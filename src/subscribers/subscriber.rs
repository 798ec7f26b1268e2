//! # Subscriber trait.
//!
//! Provides [`Subscribe`], the capability set a notifier delivers to.
//!
//! Each registered subscriber gets:
//! - **Its own FIFO queue** inside the notifier (per-subscriber ordering)
//! - **Fault isolation**: an error or panic ends *this* subscription only
//!
//! ## Architecture
//! ```text
//! Notifier::post ──► [queue S1] ──► S1.on_item()
//!               └──► [queue S2] ──► S2.on_item() ── Err/panic ──► S2.on_error(), evicted
//! ```
//!
//! ## Rules
//! - `on_item` calls for one subscriber never overlap and arrive in post order.
//! - After `on_error` the subscriber receives nothing more from that notifier.
//! - `on_completed` is sent when the notifier completes; no items follow it.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use herald::{DeliveryError, Item, Subscribe};
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl Subscribe for Counter {
//!     fn on_item(&self, _item: &Item) -> Result<(), DeliveryError> {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//!
//!     fn on_error(&self, err: &DeliveryError) {
//!         eprintln!("counter stopped: {err}");
//!     }
//!
//!     fn name(&self) -> &str { "counter" }
//! }
//! ```

use crate::error::DeliveryError;
use crate::items::Item;

/// Receiver of items, completion and error signals from a notifier.
///
/// ### Implementation requirements
/// - Keep callbacks short; in inline mode they run on the posting thread.
/// - Callbacks may call back into the notifier (post, register, release); the
///   notifier never holds its lock while running them.
/// - `on_error` must not swallow the failure silently.
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one delivered item.
    ///
    /// Returning `Err` ends the subscription: the notifier calls [`Self::on_error`]
    /// and removes this subscriber from its roster.
    fn on_item(&self, item: &Item) -> Result<(), DeliveryError>;

    /// Signals that no further items will arrive on this subscription.
    fn on_completed(&self) {}

    /// Signals that delivery to this subscriber failed.
    fn on_error(&self, error: &DeliveryError);

    /// Returns the subscriber name used in logs and delivery errors.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
