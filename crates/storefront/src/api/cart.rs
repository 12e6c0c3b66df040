//! Cart endpoints. All require a signed-in member.

use fruit_mall_core::{CartItemId, ProductId};
use tracing::instrument;

use super::{AddCartItem, ApiClient, ApiError, CartItem, CartSummary, UpdateCartItem};

impl ApiClient {
    /// Get the member's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<CartSummary, ApiError> {
        self.get(&["cart"]).await
    }

    /// Add a product to the cart. The backend merges repeat additions into one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %fruit_id))]
    pub async fn add_cart_item(
        &self,
        fruit_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.post(&["cart"], &AddCartItem { fruit_id, quantity })
            .await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn update_cart_item(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.put(&["cart", &id.to_string()], &UpdateCartItem { quantity })
            .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
        self.delete(&["cart", &id.to_string()]).await
    }

    /// Remove every cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.delete(&["cart"]).await
    }
}
