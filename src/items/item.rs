//! # Item record and its default rendering.
//!
//! Two items are the *same item* iff their ids are equal; headline and body play
//! no part in identity. Only positive ids are accepted by a notifier.

use std::fmt;
use std::sync::Arc;

/// Shared handle to a posted item. The notifier log and every pending delivery
/// point at the same allocation.
pub type ItemRef = Arc<Item>;

/// # Immutable published record.
///
/// # Example
/// ```
/// use herald::Item;
///
/// let item = Item::new(1, "Rates hold", "The board kept rates unchanged.");
/// assert!(item.is_postable());
/// assert_eq!(item.to_string(), "1;Rates hold;The board kept rates unchanged.");
///
/// // identity is the id only
/// assert!(item.same_item(&Item::new(1, "other", "text")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    id: i64,
    headline: String,
    body: String,
}

impl Item {
    /// Creates a new item. Any id is accepted here; non-positive ids are ignored on post.
    pub fn new(id: i64, headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            headline: headline.into(),
            body: body.into(),
        }
    }

    /// Returns the identity key.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the headline.
    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Returns the body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// `true` if a notifier would accept this item (positive id).
    #[inline]
    pub fn is_postable(&self) -> bool {
        self.id > 0
    }

    /// Identity comparison: same id, regardless of text fields.
    #[inline]
    pub fn same_item(&self, other: &Item) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Item {
    /// Semicolon-joined `id;headline;body`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.id, self.headline, self.body)
    }
}

/// Default rendering used by [`Reader`](crate::Reader): `id;headline;body`.
///
/// Pure and deterministic; equal fields always produce equal strings.
pub fn render(item: &Item) -> String {
    item.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_semicolon_joined() {
        let item = Item::new(42, "Headline", "Body text");
        assert_eq!(render(&item), "42;Headline;Body text");
        assert_eq!(render(&item), render(&item.clone()));
    }

    #[test]
    fn identity_ignores_text_fields() {
        let a = Item::new(3, "a", "b");
        let b = Item::new(3, "c", "d");
        assert!(a.same_item(&b));
        assert_ne!(a, b);
        assert!(!a.same_item(&Item::new(4, "a", "b")));
    }

    #[test]
    fn only_positive_ids_are_postable() {
        assert!(Item::new(1, "", "").is_postable());
        assert!(!Item::new(0, "", "").is_postable());
        assert!(!Item::new(-5, "", "").is_postable());
    }
}
