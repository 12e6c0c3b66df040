//! Order endpoints.

use fruit_mall_core::OrderId;
use tracing::instrument;

use super::{ApiClient, ApiError, CreateOrderRequest, Order};

impl ApiClient {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the request fails.
    #[instrument(skip(self, request), fields(lines = request.order_items.len(), payment = %request.payment_method))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.post(&["orders"], request).await
    }

    /// Get one of the member's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&["orders", &id.to_string()]).await
    }

    /// Get every order the member has placed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get(&["orders", "my-orders"]).await
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the cancellation or the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.put_empty(&["orders", &id.to_string(), "cancel"]).await
    }
}
