//! Storefront routes and navigation guards.
//!
//! # Routes
//!
//! - Public: home, login, register, product list/detail, category
//! - Private (signed-in member): cart, wishlist, checkout, order complete, my page
//! - Admin (`ROLE_ADMIN`): everything under `/admin`
//!
//! Anything else resolves to [`Route::NotFound`].

mod guard;
pub mod paths;

pub use guard::{RouteDecision, guard};

use fruit_mall_core::{CategoryId, OrderId, ProductId};

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Signed-in members.
    Private,
    /// Administrators.
    Admin,
}

/// A resolved storefront location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Products,
    ProductDetail(ProductId),
    Category(CategoryId),
    Cart,
    Wishlist,
    Checkout,
    OrderComplete(Option<OrderId>),
    MyPage,
    MyOrders,
    MyReviews,
    MyProfile,
    /// An admin page; holds the path below `/admin`.
    Admin(String),
    /// No page lives at this path.
    NotFound(String),
}

impl Route {
    /// Resolve a path, ignoring any fragment and trailing slash.
    ///
    /// ```
    /// use fruit_mall_core::ProductId;
    /// use fruit_mall_storefront::routes::Route;
    ///
    /// assert_eq!(Route::parse("/products/7"), Route::ProductDetail(ProductId::new(7)));
    /// assert_eq!(Route::parse("/cart/"), Route::Cart);
    /// assert!(matches!(Route::parse("/nope"), Route::NotFound(_)));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let without_fragment = raw.split('#').next().unwrap_or_default();
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["products"] => Self::Products,
            ["products", id] => id
                .parse()
                .map_or_else(|_| Self::not_found(path), Self::ProductDetail),
            ["category", id] => id
                .parse()
                .map_or_else(|_| Self::not_found(path), Self::Category),
            ["cart"] => Self::Cart,
            ["wishlist"] => Self::Wishlist,
            ["checkout"] => Self::Checkout,
            ["order-complete"] => Self::OrderComplete(query_param(query, "orderId")),
            ["my-page"] => Self::MyPage,
            ["my-page", "orders"] => Self::MyOrders,
            ["my-page", "reviews"] => Self::MyReviews,
            ["my-page", "profile"] => Self::MyProfile,
            ["admin", rest @ ..] => Self::Admin(rest.join("/")),
            _ => Self::not_found(path),
        }
    }

    fn not_found(path: &str) -> Self {
        Self::NotFound(path.to_string())
    }

    /// Who may open this route.
    #[must_use]
    pub const fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::Login
            | Self::Register
            | Self::Products
            | Self::ProductDetail(_)
            | Self::Category(_)
            | Self::NotFound(_) => Access::Public,
            Self::Cart
            | Self::Wishlist
            | Self::Checkout
            | Self::OrderComplete(_)
            | Self::MyPage
            | Self::MyOrders
            | Self::MyReviews
            | Self::MyProfile => Access::Private,
            Self::Admin(_) => Access::Admin,
        }
    }

    /// The canonical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => paths::HOME.to_string(),
            Self::Login => paths::LOGIN.to_string(),
            Self::Register => paths::REGISTER.to_string(),
            Self::Products => paths::PRODUCTS.to_string(),
            Self::ProductDetail(id) => paths::product_detail(*id),
            Self::Category(id) => paths::category(*id),
            Self::Cart => paths::CART.to_string(),
            Self::Wishlist => paths::WISHLIST.to_string(),
            Self::Checkout => paths::CHECKOUT.to_string(),
            Self::OrderComplete(Some(id)) => paths::order_complete(*id),
            Self::OrderComplete(None) => paths::ORDER_COMPLETE.to_string(),
            Self::MyPage => paths::MY_PAGE.to_string(),
            Self::MyOrders => paths::MY_ORDERS.to_string(),
            Self::MyReviews => paths::MY_REVIEWS.to_string(),
            Self::MyProfile => paths::MY_PROFILE.to_string(),
            Self::Admin(rest) if rest.is_empty() => paths::ADMIN.to_string(),
            Self::Admin(rest) => format!("{}/{rest}", paths::ADMIN),
            Self::NotFound(path) => path.clone(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

fn query_param<T: std::str::FromStr>(query: &str, key: &str) -> Option<T> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| v.parse().ok())
}
