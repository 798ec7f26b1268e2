//! # Per-subscriber delivery workers.
//!
//! In [`DeliveryMode::Worker`](crate::DeliveryMode::Worker) every registration
//! gets a dedicated tokio task that drains its queue.
//!
//! ```text
//! push(signal) ──► [queue] ── notify ──► worker ──► Shared::deliver() ──► on_item()
//!                                          └─ closed ──► exit
//! ```
//!
//! ## Rules
//! - Per-subscriber FIFO; no ordering across subscribers.
//! - The worker holds the notifier weakly and exits once its entry is closed
//!   (release, eviction, completion, or notifier drop).
//! - A release that races an in-flight callback does not wait for it.

use std::sync::{Arc, Weak};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::trace;

use super::core::Shared;
use super::roster::{Entry, Next};

/// Spawns the detached worker for `entry` on `rt`.
pub(crate) fn spawn(
    rt: &Handle,
    shared: Weak<Shared>,
    entry: Arc<Entry>,
    wake: Arc<Notify>,
) {
    rt.spawn(async move {
        loop {
            match entry.next_queued() {
                Next::Signal(signal) => {
                    let Some(shared) = shared.upgrade() else {
                        break;
                    };
                    shared.deliver(&entry, signal);
                }
                Next::Idle => wake.notified().await,
                Next::Closed => break,
            }
        }
        trace!(subscriber = entry.name(), entry = entry.id, "delivery worker exited");
    });
}
