//! # Subscribers of a notifier.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! that receive items from a [`Notifier`](crate::Notifier).
//!
//! ## Architecture
//! ```text
//! Notifier ── post(Item) ──► roster fan-out
//!                               │
//!                               ├──► Subscribe::on_item(&Item)
//!                               │         │
//!                               │    ┌────┴─────┬─────────┬───────┐
//!                               │    ▼          ▼         ▼       ▼
//!                               │  Reader    LogWriter  Custom   ...
//!                               │
//!                               └──► on_completed() / on_error()
//! ```
//!
//! ## Subscriber types
//! - **Projecting subscribers** - keep rendered items ([`Reader`])
//! - **Passive subscribers** - observe and react (logging, metrics, alerts)

#[cfg(feature = "logging")]
mod log;
mod reader;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use reader::{Reader, Renderer};
pub use subscriber::Subscribe;
