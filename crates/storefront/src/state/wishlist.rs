//! Wishlist store.

use fruit_mall_core::{ProductId, WishlistItemId};

use crate::api::WishlistItem;

use super::{Loadable, RequestTicket};

/// Outcome of toggling a product's wishlist membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistToggle {
    /// The product was saved.
    Added(WishlistItem),
    /// The product was removed.
    Removed(ProductId),
}

/// The member's saved products. Each product appears at most once.
#[derive(Debug, Default)]
pub struct WishlistStore {
    items: Loadable<Vec<WishlistItem>>,
}

impl WishlistStore {
    /// Current entries.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        self.items.data()
    }

    /// Request state of the wishlist.
    #[must_use]
    pub const fn state(&self) -> &Loadable<Vec<WishlistItem>> {
        &self.items
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Whether `product` is saved.
    #[must_use]
    pub fn contains(&self, product: ProductId) -> bool {
        self.entry_for(product).is_some()
    }

    /// The entry for `product`, if saved.
    #[must_use]
    pub fn entry_for(&self, product: ProductId) -> Option<&WishlistItem> {
        self.items().iter().find(|item| item.fruit_id == product)
    }

    /// Start a wishlist request.
    pub fn begin(&mut self) -> RequestTicket {
        self.items.begin()
    }

    /// Replace the entries with a fetched wishlist, dropping duplicate products.
    pub fn loaded(&mut self, ticket: RequestTicket, items: Vec<WishlistItem>) -> bool {
        self.items.fulfil_with(ticket, |current| {
            current.clear();
            for item in items {
                insert_unique(current, item);
            }
        })
    }

    /// Record an added entry unless the product is already saved.
    pub fn added(&mut self, ticket: RequestTicket, item: WishlistItem) -> bool {
        self.items
            .fulfil_with(ticket, |items| insert_unique(items, item))
    }

    /// Drop a removed entry.
    pub fn removed(&mut self, ticket: RequestTicket, id: WishlistItemId) -> bool {
        self.items
            .fulfil_with(ticket, |items| items.retain(|item| item.id != id))
    }

    /// Drop every entry after the wishlist was cleared.
    pub fn cleared(&mut self, ticket: RequestTicket) -> bool {
        self.items.fulfil_with(ticket, Vec::clear)
    }

    /// Record a failed wishlist request.
    pub fn failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        self.items.reject(ticket, message)
    }

    /// Forget the wishlist, e.g. on logout.
    pub fn reset(&mut self) {
        self.items.reset(Vec::new());
    }
}

fn insert_unique(items: &mut Vec<WishlistItem>, item: WishlistItem) {
    let duplicate = items
        .iter()
        .any(|existing| existing.id == item.id || existing.fruit_id == item.fruit_id);
    if !duplicate {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use fruit_mall_core::Price;

    use super::*;

    fn entry(id: i64, fruit: i64) -> WishlistItem {
        WishlistItem {
            id: WishlistItemId::new(id),
            member_id: None,
            fruit_id: ProductId::new(fruit),
            fruit_name: format!("Fruit {fruit}"),
            fruit_image_url: None,
            fruit_price: Price::from_won(1_000),
            stock_quantity: 5,
            origin: String::new(),
            season: String::new(),
            added_date: None,
        }
    }

    #[test]
    fn test_adding_same_product_twice_keeps_one_entry() {
        let mut wishlist = WishlistStore::default();
        let t = wishlist.begin();
        wishlist.added(t, entry(1, 10));
        let t = wishlist.begin();
        wishlist.added(t, entry(1, 10));
        let t = wishlist.begin();
        wishlist.added(t, entry(2, 10));

        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(ProductId::new(10)));
    }

    #[test]
    fn test_loaded_drops_duplicate_products() {
        let mut wishlist = WishlistStore::default();
        let t = wishlist.begin();
        wishlist.loaded(t, vec![entry(1, 10), entry(2, 11), entry(3, 10)]);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut wishlist = WishlistStore::default();
        let t = wishlist.begin();
        wishlist.loaded(t, vec![entry(1, 10), entry(2, 11)]);

        let t = wishlist.begin();
        wishlist.removed(t, WishlistItemId::new(1));
        assert!(!wishlist.contains(ProductId::new(10)));

        let t = wishlist.begin();
        wishlist.cleared(t);
        assert!(wishlist.is_empty());
    }
}
