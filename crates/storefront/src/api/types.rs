//! Wire types exchanged with the Fruit Mall backend.
//!
//! The backend speaks camelCase JSON. Timestamps are zone-less local
//! date-times and money is a plain number of won.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use fruit_mall_core::{
    CartItemId, CategoryId, MemberId, OrderDetailId, OrderId, OrderStatus, PaymentMethod, Price,
    ProductId, ReviewId, Role, WishlistItemId,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// Token issued on successful login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(deserialize_with = "secret_from_string")]
    pub token: SecretString,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in milliseconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// New member registration for `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Profile edit for `PUT /members/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Password change for `PUT /members/{id}/password`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequest").finish_non_exhaustive()
    }
}

/// The signed-in member, from `GET /members/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: MemberId,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

fn secret_from_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl CurrentUser {
    /// Whether the member holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A fruit in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "fruitName")]
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub stock_quantity: i64,
    pub price: Price,
    pub category_id: CategoryId,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

// =============================================================================
// Cart
// =============================================================================

/// One line in the member's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    #[serde(default)]
    pub member_id: Option<MemberId>,
    pub fruit_id: ProductId,
    pub fruit_name: String,
    #[serde(default)]
    pub fruit_image_url: Option<String>,
    pub fruit_price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub added_date: Option<NaiveDateTime>,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.fruit_price.times(self.quantity)
    }
}

/// Response of `GET /cart`. Aggregates sent by the server are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItem {
    pub fruit_id: ProductId,
    pub quantity: u32,
}

/// Body of `PUT /cart/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateCartItem {
    pub quantity: u32,
}

// =============================================================================
// Wishlist
// =============================================================================

/// A product saved to the member's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    #[serde(default)]
    pub member_id: Option<MemberId>,
    pub fruit_id: ProductId,
    pub fruit_name: String,
    #[serde(default)]
    pub fruit_image_url: Option<String>,
    pub fruit_price: Price,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub added_date: Option<NaiveDateTime>,
}

/// Response of `GET /wishlist`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistSummary {
    #[serde(default)]
    pub wishlist_items: Vec<WishlistItem>,
}

/// Body of `POST /wishlist`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItem {
    pub fruit_id: ProductId,
}

// =============================================================================
// Orders
// =============================================================================

/// Where and to whom an order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub recipient: String,
    pub phone_number: String,
    pub zip_code: String,
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub delivery_request: String,
}

/// One product and quantity in an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub fruit_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    pub delivery_info: DeliveryInfo,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub member_id: Option<MemberId>,
    #[serde(default)]
    pub member_name: Option<String>,
    pub order_date: NaiveDateTime,
    pub total_price: Price,
    pub payment_method: PaymentMethod,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub order_details: Vec<OrderDetail>,
}

/// A product line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderDetailId,
    pub order_id: OrderId,
    pub fruit_id: ProductId,
    pub fruit_name: String,
    #[serde(default)]
    pub fruit_image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Price,
}

// =============================================================================
// Reviews
// =============================================================================

/// A product review written by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub order_id: OrderId,
    pub fruit_id: ProductId,
    #[serde(default)]
    pub fruit_name: String,
    #[serde(default)]
    pub fruit_image_url: Option<String>,
    pub rating: u8,
    pub content: String,
    pub review_date: NaiveDateTime,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Reviews of one product with the aggregate rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub fruit_id: ProductId,
    #[serde(default)]
    pub fruit_name: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub order_detail_id: OrderDetailId,
    pub rating: u8,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(default)]
    pub errors: Option<BTreeMap<String, String>>,
}
