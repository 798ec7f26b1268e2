//! # Published items.
//!
//! This module provides the unit of data that flows through a notifier:
//! - [`Item`] - immutable record, identified by its `id`
//! - [`ItemRef`] - shared reference to an item (`Arc<Item>`)
//! - [`render`] - the default stable text rendering used by subscribers

mod item;

pub use item::{render, Item, ItemRef};
