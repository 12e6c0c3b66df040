//! Wishlist endpoints.

use fruit_mall_core::{ProductId, WishlistItemId};
use tracing::instrument;

use super::{AddWishlistItem, ApiClient, ApiError, WishlistItem, WishlistSummary};

impl ApiClient {
    /// Get the member's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<WishlistSummary, ApiError> {
        self.get(&["wishlist"]).await
    }

    /// Save a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %fruit_id))]
    pub async fn add_wishlist_item(&self, fruit_id: ProductId) -> Result<WishlistItem, ApiError> {
        self.post(&["wishlist"], &AddWishlistItem { fruit_id }).await
    }

    /// Remove a wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(wishlist_item_id = %id))]
    pub async fn remove_wishlist_item(&self, id: WishlistItemId) -> Result<(), ApiError> {
        self.delete(&["wishlist", &id.to_string()]).await
    }

    /// Remove every wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self) -> Result<(), ApiError> {
        self.delete(&["wishlist"]).await
    }
}
