//! Cart store.

use fruit_mall_core::{CartItemId, ProductId};

use crate::api::CartItem;
use crate::cart::{CartTotals, ShippingPolicy, compute_totals};

use super::{Loadable, RequestTicket};

/// The member's cart lines. Totals are derived on every read.
#[derive(Debug, Default)]
pub struct CartStore {
    items: Loadable<Vec<CartItem>>,
}

impl CartStore {
    /// Current cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.items.data()
    }

    /// Request state of the cart.
    #[must_use]
    pub const fn state(&self) -> &Loadable<Vec<CartItem>> {
        &self.items
    }

    /// Totals of the current lines under `policy`.
    #[must_use]
    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        compute_totals(self.items(), policy)
    }

    /// Find a line by its ID.
    #[must_use]
    pub fn line(&self, id: CartItemId) -> Option<&CartItem> {
        self.items().iter().find(|item| item.id == id)
    }

    /// Find the line holding `product`.
    #[must_use]
    pub fn line_for(&self, product: ProductId) -> Option<&CartItem> {
        self.items().iter().find(|item| item.fruit_id == product)
    }

    /// Start a cart request.
    pub fn begin(&mut self) -> RequestTicket {
        self.items.begin()
    }

    /// Replace the lines with a fetched cart.
    pub fn loaded(&mut self, ticket: RequestTicket, items: Vec<CartItem>) -> bool {
        self.items.fulfil(ticket, items)
    }

    /// Insert or replace a line returned by an add or update.
    pub fn upserted(&mut self, ticket: RequestTicket, item: CartItem) -> bool {
        self.items.fulfil_with(ticket, |items| {
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        })
    }

    /// Drop a removed line.
    pub fn removed(&mut self, ticket: RequestTicket, id: CartItemId) -> bool {
        self.items
            .fulfil_with(ticket, |items| items.retain(|item| item.id != id))
    }

    /// Drop every line after the cart was cleared.
    pub fn cleared(&mut self, ticket: RequestTicket) -> bool {
        self.items.fulfil_with(ticket, Vec::clear)
    }

    /// Record a failed cart request.
    pub fn failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        self.items.reject(ticket, message)
    }

    /// Forget the cart, e.g. on logout.
    pub fn reset(&mut self) {
        self.items.reset(Vec::new());
    }
}
