//! # herald
//!
//! **Herald** is a small in-process publish/subscribe notifier.
//!
//! A [`Notifier`] keeps an append-only log of [`Item`]s and a roster of
//! subscribers. New subscribers get the whole log replayed before they see live
//! posts; items are deduplicated by id; a [`Subscription`] token removes its
//! subscriber from the roster when released or dropped.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Reader A   │   │   Reader B   │   │  LogWriter   │
//!     │ (projection) │   │ (projection) │   │   (stdout)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ register         │ register         │ register
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Notifier                                                         │
//! │  - log     (Vec<Arc<Item>>, unique positive ids, append-only)     │
//! │  - roster  (entries in registration order, one per instance)      │
//! │  - one Mutex over both: replay+join and append+fan-out are atomic │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     [queue A]          [queue B]          [queue L]     per-subscriber FIFO
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//!   A.on_item()        B.on_item()        L.on_item()     inline or worker task
//! ```
//!
//! ### Lifecycle
//! ```text
//! Reader::new(name) ──► subscribe(n) ──► Notifier::register
//!   ├─► replay every logged item (log order)
//!   ├─► join roster
//!   ├─► live posts: on_item per post, in post order
//!   │       └─ Err / panic ──► on_error, evicted
//!   └─► unsubscribe(): token.release() ──► off roster, projection cleared
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits             |
//! |-------------------|--------------------------------------------------------------|--------------------------------|
//! | **Notifier**      | Log, roster, replay and fan-out.                              | [`Notifier`], [`Subscription`] |
//! | **Subscriber API**| Receive items, completion and errors.                         | [`Subscribe`], [`Reader`]      |
//! | **Items**         | Immutable records deduplicated by id.                         | [`Item`], [`render`]           |
//! | **Errors**        | Typed errors for construction, state and delivery.            | [`SubscriberError`], [`DeliveryError`] |
//! | **Configuration** | Delivery mode, panic capture, log label.                      | [`Config`], [`DeliveryMode`]   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use herald::{Item, Notifier, Reader};
//!
//! # fn main() -> Result<(), herald::SubscriberError> {
//! let n = Notifier::new();
//! let nyt = Reader::new("New York Times")?;
//! let wapo = Reader::new("Washington Post")?;
//!
//! n.post(Item::new(1, "Quake", "A 5.1 quake shook the coast."));
//! nyt.subscribe(&n);
//! n.post(Item::new(2, "Vote", "The bill passed 61-39."));
//! wapo.subscribe(&n);
//! n.post(Item::new(3, "Rain", "Heavy rain expected."));
//!
//! assert_eq!(nyt.projection(), wapo.projection());
//! assert_eq!(nyt.projection().len(), 3);
//!
//! nyt.unsubscribe()?;
//! assert!(nyt.projection().is_empty());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod items;
mod notifier;
mod subscribers;

// ---- Public re-exports ----

pub use config::{Config, DeliveryMode};
pub use error::{ConfigError, DeliveryError, SubscriberError};
pub use items::{render, Item, ItemRef};
pub use notifier::{Notifier, Subscription};
pub use subscribers::{Reader, Renderer, Subscribe};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
