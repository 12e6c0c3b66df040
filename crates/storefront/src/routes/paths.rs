//! Every path the storefront navigates to.

use fruit_mall_core::{CategoryId, OrderId, ProductId};

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const PRODUCTS: &str = "/products";
pub const CART: &str = "/cart";
pub const WISHLIST: &str = "/wishlist";
pub const CHECKOUT: &str = "/checkout";
pub const ORDER_COMPLETE: &str = "/order-complete";
pub const MY_PAGE: &str = "/my-page";
pub const MY_ORDERS: &str = "/my-page/orders";
pub const MY_REVIEWS: &str = "/my-page/reviews";
pub const MY_PROFILE: &str = "/my-page/profile";
pub const ADMIN: &str = "/admin";

#[must_use]
pub fn product_detail(id: ProductId) -> String {
    format!("{PRODUCTS}/{id}")
}

#[must_use]
pub fn category(id: CategoryId) -> String {
    format!("/category/{id}")
}

/// Order-complete page for a freshly placed order.
#[must_use]
pub fn order_complete(id: OrderId) -> String {
    format!("{ORDER_COMPLETE}?orderId={id}")
}
