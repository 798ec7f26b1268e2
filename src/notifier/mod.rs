//! # Notifier and subscription tokens.
//!
//! - [`Notifier`] owns the append-only item log and the subscriber roster,
//!   replays history to new subscribers and fans out live posts.
//! - [`Subscription`] is the token returned by registration; releasing it
//!   (or dropping it) removes the subscriber from the roster.
//!
//! Internal modules:
//! - `roster`: per-subscriber entries and FIFO delivery queues;
//! - `worker`: tokio tasks draining queues in worker delivery mode.
//!
//! ## Lifecycle of one registration
//! ```text
//! register(S) ──► replay log ──► on roster ──► live posts ──► release()/drop ──► off roster
//!                                    │
//!                                    ├── on_item Err / panic ──► on_error ──► evicted
//!                                    └── complete() ──► on_completed ──► off roster
//! ```

mod core;
mod roster;
mod subscription;
mod worker;

pub use self::core::Notifier;
pub(crate) use roster::lock;
pub use subscription::Subscription;
