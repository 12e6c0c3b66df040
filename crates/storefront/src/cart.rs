//! Cart totals and shipping fee rules.
//!
//! Totals are never stored. They are recomputed from the current item list
//! every time they are read, so they cannot drift from the items.

use fruit_mall_core::Price;

use crate::api::CartItem;

/// Flat-fee shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Fee charged below the threshold.
    pub flat_fee: Price,
    /// Subtotal at or above which shipping is free.
    pub free_threshold: Price,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_fee: Price::from_won(3_000),
            free_threshold: Price::from_won(100_000),
        }
    }
}

impl ShippingPolicy {
    /// Shipping fee for a given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Aggregates derived from a cart's item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities over all lines.
    pub item_count: u64,
    /// Number of distinct lines.
    pub line_count: usize,
    /// Sum of unit price times quantity.
    pub subtotal: Price,
    /// Zero when the subtotal reaches the free-shipping threshold.
    pub shipping_fee: Price,
    /// Subtotal plus shipping fee.
    pub grand_total: Price,
    /// How much more must be spent to ship for free, zero once reached.
    pub free_shipping_remaining: Price,
}

impl CartTotals {
    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Compute the totals of `items` under `policy`.
///
/// ```
/// use fruit_mall_core::Price;
/// use fruit_mall_storefront::cart::{ShippingPolicy, compute_totals};
///
/// let totals = compute_totals(&[], &ShippingPolicy::default());
/// assert_eq!(totals.subtotal, Price::ZERO);
/// assert_eq!(totals.shipping_fee, Price::from_won(3_000));
/// ```
#[must_use]
pub fn compute_totals(items: &[CartItem], policy: &ShippingPolicy) -> CartTotals {
    let subtotal: Price = items.iter().map(CartItem::line_total).sum();
    let item_count = items.iter().map(|item| u64::from(item.quantity)).sum();
    let shipping_fee = policy.fee_for(subtotal);
    let free_shipping_remaining = if subtotal >= policy.free_threshold {
        Price::ZERO
    } else {
        Price::new(policy.free_threshold.amount() - subtotal.amount())
    };

    CartTotals {
        item_count,
        line_count: items.len(),
        subtotal,
        shipping_fee,
        grand_total: subtotal + shipping_fee,
        free_shipping_remaining,
    }
}
