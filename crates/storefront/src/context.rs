//! Application context.
//!
//! [`AppContext`] owns the API client, persisted token storage and every
//! client-side store. Front ends construct one at startup with
//! [`AppContext::start`], drive it through its `async` operations and hand
//! it back to [`AppContext::shutdown`] on exit.
//!
//! Every operation follows the same shape: issue a ticket on the affected
//! store, call the backend, then settle the store with the outcome. A `401`
//! from any call ends the session. Operations take `&mut self`, so one
//! context never has two requests in flight.

use fruit_mall_core::{
    CartItemId, CategoryId, Email, MemberId, OrderDetailId, OrderId, PaymentMethod, PhoneNumber,
    ProductId, ReviewId, WishlistItemId,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::api::{
    ApiClient, ApiError, CartItem, Category, CurrentUser, DeliveryInfo, LoginRequest, Order,
    OrderDetail, Product, RegisterRequest, Review, ReviewSummary, UpdateMemberRequest,
    WishlistItem,
};
use crate::cart::CartTotals;
use crate::catalog::{CatalogPage, CatalogQuery, HOME_NEWEST_COUNT};
use crate::checkout;
use crate::profile;
use crate::config::StorefrontConfig;
use crate::error::{self, AppError, Result};
use crate::reviews;
use crate::routes::{self, Route, RouteDecision};
use crate::state::{
    CartStore, CatalogSource, CatalogStore, LoadStatus, Loadable, RequestTicket, SessionStore,
    WishlistStore, WishlistToggle,
};
use crate::storage::{FileTokenStore, TokenStore};

/// Everything a front end needs to run the storefront.
pub struct AppContext {
    config: StorefrontConfig,
    api: ApiClient,
    token_store: Box<dyn TokenStore>,
    session: SessionStore,
    cart: CartStore,
    wishlist: WishlistStore,
    catalog: CatalogStore,
    orders: Loadable<Vec<Order>>,
    my_reviews: Loadable<Vec<Review>>,
    last_order: Option<Order>,
    current_route: Route,
}

impl AppContext {
    /// Start with the token persisted at `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the storage
    /// file exists but cannot be read.
    pub fn start(config: StorefrontConfig) -> Result<Self> {
        let store = FileTokenStore::new(config.token_path.clone());
        Self::with_token_store(config, Box::new(store))
    }

    /// Start with a caller-provided token store.
    ///
    /// The client is authenticated from the outset if the store holds a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the store
    /// cannot be read.
    pub fn with_token_store(
        config: StorefrontConfig,
        token_store: Box<dyn TokenStore>,
    ) -> Result<Self> {
        let mut api = ApiClient::new(&config.api)?;
        let token = token_store.load()?;
        api.set_token(token.clone());

        info!(
            api_url = %config.api.base_url,
            authenticated = token.is_some(),
            "Storefront started"
        );

        Ok(Self {
            config,
            api,
            token_store,
            session: SessionStore::with_token(token),
            cart: CartStore::default(),
            wishlist: WishlistStore::default(),
            catalog: CatalogStore::default(),
            orders: Loadable::default(),
            my_reviews: Loadable::default(),
            last_order: None,
            current_route: Route::Home,
        })
    }

    /// Stop the storefront, dropping cached lookups.
    ///
    /// The persisted token is left in place so the next start is signed in.
    pub fn shutdown(self) {
        self.api.invalidate_cache();
        info!(
            authenticated = self.session.is_authenticated(),
            "Storefront stopped"
        );
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// The member's orders, as last fetched.
    #[must_use]
    pub const fn orders(&self) -> &Loadable<Vec<Order>> {
        &self.orders
    }

    /// The member's reviews, as last fetched.
    #[must_use]
    pub const fn my_reviews(&self) -> &Loadable<Vec<Review>> {
        &self.my_reviews
    }

    /// Totals of the current cart under the configured shipping policy.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals(&self.config.shipping)
    }

    /// The order placed by the most recent successful checkout.
    #[must_use]
    pub const fn last_order(&self) -> Option<&Order> {
        self.last_order.as_ref()
    }

    /// Where the last navigation ended up.
    #[must_use]
    pub const fn current_route(&self) -> &Route {
        &self.current_route
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Sign in and fetch the member's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are blank or rejected, the token
    /// cannot be persisted, or the profile fetch fails.
    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        username_or_email: &str,
        password: &SecretString,
    ) -> Result<CurrentUser> {
        let username_or_email = username_or_email.trim();
        if username_or_email.is_empty() || password.expose_secret().is_empty() {
            return Err(AppError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let request = LoginRequest {
            username_or_email: username_or_email.to_string(),
            password: password.expose_secret().to_string(),
        };
        let result = self.api.login(&request).await;
        let response = self.settle(result)?;

        self.token_store.save(&response.token)?;
        self.api.set_token(Some(response.token.clone()));
        self.session.signed_in(response.token);
        self.cart.reset();
        self.wishlist.reset();
        info!("Signed in");

        self.fetch_current_user().await
    }

    /// Create a member account. The new member still has to sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is blank, the email or phone
    /// number is malformed, or the backend rejects the registration.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&mut self, request: RegisterRequest) -> Result<CurrentUser> {
        let required = [
            ("username", &request.username),
            ("password", &request.password),
            ("name", &request.name),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(format!("{field} is required")));
        }
        Email::parse(&request.email).map_err(|e| AppError::Validation(e.to_string()))?;
        PhoneNumber::parse(&request.phone_number)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = self.api.register(&request).await;
        let user = self.settle(result)?;
        info!(member_id = %user.id, "Registered");
        Ok(user)
    }

    /// Sign out, forgetting the token and every member-specific store.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed. In-memory
    /// state is cleared regardless.
    pub fn logout(&mut self) -> Result<()> {
        let cleared = self.token_store.clear();
        self.end_session();
        info!("Signed out");
        cleared.map_err(AppError::from)
    }

    /// Fetch the signed-in member's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotAuthenticated`] without a session, or an error
    /// if the request fails.
    pub async fn fetch_current_user(&mut self) -> Result<CurrentUser> {
        self.require_auth()?;
        let ticket = self.session.begin_profile();
        let result = self.api.current_user().await;
        match self.settle(result) {
            Ok(user) => {
                error::set_sentry_user(&user.id, Some(&user.email));
                self.session.profile_loaded(ticket, user.clone());
                Ok(user)
            }
            Err(e) => {
                self.session.profile_failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch the profile if a session was restored without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile has to be fetched and the request fails.
    pub async fn ensure_profile(&mut self) -> Result<()> {
        if self.session.is_authenticated() && self.session.user().is_none() {
            self.fetch_current_user().await?;
        }
        Ok(())
    }

    /// Edit the signed-in member's name, phone number and address, then
    /// refetch the profile.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, if the name is blank or the phone
    /// number malformed, or if the backend rejects the update.
    #[instrument(skip(self, request))]
    pub async fn update_profile(&mut self, request: UpdateMemberRequest) -> Result<CurrentUser> {
        self.require_auth()?;
        let request = profile::update_request(request)?;
        let id = self.member_id().await?;

        let result = self.api.update_member(id, &request).await;
        self.settle(result)?;
        info!(member_id = %id, "Profile updated");

        self.fetch_current_user().await
    }

    /// Change the signed-in member's password. The session stays open.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, if the confirmation differs or
    /// the new password breaks the policy, or if the backend rejects the
    /// current password.
    #[instrument(skip_all)]
    pub async fn change_password(
        &mut self,
        current: &SecretString,
        new: &SecretString,
        confirm: &SecretString,
    ) -> Result<()> {
        self.require_auth()?;
        let request = profile::password_change(current, new, confirm)?;
        let id = self.member_id().await?;

        let result = self.api.change_password(id, &request).await;
        self.settle(result)?;
        info!(member_id = %id, "Password changed");
        Ok(())
    }

    async fn member_id(&mut self) -> Result<MemberId> {
        match self.session.user() {
            Some(user) => Ok(user.id),
            None => Ok(self.fetch_current_user().await?.id),
        }
    }

    fn require_auth(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    fn end_session(&mut self) {
        self.api.set_token(None);
        self.session.clear();
        self.cart.reset();
        self.wishlist.reset();
        self.orders.reset(Vec::new());
        self.my_reviews.reset(Vec::new());
        self.last_order = None;
        error::clear_sentry_user();
    }

    /// Convert a backend outcome, ending the session on `401`.
    fn settle<T>(&mut self, result: std::result::Result<T, ApiError>) -> Result<T> {
        result.map_err(|e| {
            let err = AppError::from(e);
            if err.is_unauthorized() && self.session.is_authenticated() {
                warn!("Session expired, signing out");
                if let Err(clear_err) = self.token_store.clear() {
                    AppError::from(clear_err).report();
                }
                self.end_session();
            }
            err.report();
            err
        })
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn load_products(&mut self) -> Result<()> {
        let ticket = self.catalog.begin_products(CatalogSource::All);
        let result = self.api.list_products().await;
        self.settle_products(ticket, result)
    }

    /// Fetch one category and its products.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    pub async fn load_category(&mut self, id: CategoryId) -> Result<Category> {
        let result = self.api.category(id).await;
        let category = self.settle(result)?;

        let ticket = self.catalog.begin_products(CatalogSource::Category(id));
        let result = self.api.products_by_category(id).await;
        self.settle_products(ticket, result)?;
        Ok(category)
    }

    /// Search the catalog by keyword. A blank keyword loads everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(&mut self, keyword: &str) -> Result<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.load_products().await;
        }

        let ticket = self
            .catalog
            .begin_products(CatalogSource::Search(keyword.to_string()));
        let result = self.api.search_products(keyword).await;
        self.settle_products(ticket, result)
    }

    fn settle_products(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<Vec<Product>, ApiError>,
    ) -> Result<()> {
        match self.settle(result) {
            Ok(products) => {
                debug!(count = products.len(), "Products loaded");
                self.catalog.products_loaded(ticket, products);
                Ok(())
            }
            Err(e) => {
                self.catalog.products_failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn load_categories(&mut self) -> Result<()> {
        let ticket = self.catalog.begin_categories();
        let result = self.api.categories().await;
        match self.settle(result) {
            Ok(categories) => {
                self.catalog.categories_loaded(ticket, categories);
                Ok(())
            }
            Err(e) => {
                self.catalog.categories_failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    pub async fn product(&mut self, id: ProductId) -> Result<Product> {
        let result = self.api.product(id).await;
        self.settle(result)
    }

    /// Replace the active filter, sort and page.
    pub fn set_query(&mut self, query: CatalogQuery) {
        self.catalog.set_query(query);
    }

    /// Move to another page of the active query.
    pub const fn set_page(&mut self, page: usize) {
        self.catalog.set_page(page);
    }

    /// The active query applied to the fetched products.
    #[must_use]
    pub fn catalog_page(&self) -> CatalogPage {
        self.catalog.page()
    }

    /// Newest products for the home page. Fetches the catalog if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has to be fetched and the request fails.
    pub async fn home(&mut self) -> Result<Vec<Product>> {
        let stale = self.catalog.source() != &CatalogSource::All
            || self.catalog.product_state().status() != &LoadStatus::Loaded;
        if stale {
            self.load_products().await?;
        }
        Ok(self.catalog.newest(HOME_NEWEST_COUNT))
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Fetch the member's cart.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn load_cart(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.cart.begin();
        let result = self.api.cart().await;
        match self.settle(result) {
            Ok(summary) => {
                self.cart.loaded(ticket, summary.cart_items);
                Ok(())
            }
            Err(e) => {
                self.cart.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Put `quantity` of `product` in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, for a zero quantity, or if the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&mut self, product: ProductId, quantity: u32) -> Result<CartItem> {
        self.require_auth()?;
        ensure_quantity(quantity)?;

        let ticket = self.cart.begin();
        let result = self.api.add_cart_item(product, quantity).await;
        self.settle_cart_line(ticket, result)
    }

    /// Change a cart line's quantity. Use [`Self::remove_cart_item`] to drop it.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, for a zero quantity, or if the
    /// request fails.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(&mut self, id: CartItemId, quantity: u32) -> Result<CartItem> {
        self.require_auth()?;
        ensure_quantity(quantity)?;

        let ticket = self.cart.begin();
        let result = self.api.update_cart_item(id, quantity).await;
        self.settle_cart_line(ticket, result)
    }

    fn settle_cart_line(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<CartItem, ApiError>,
    ) -> Result<CartItem> {
        match self.settle(result) {
            Ok(item) => {
                self.cart.upserted(ticket, item.clone());
                Ok(item)
            }
            Err(e) => {
                self.cart.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&mut self, id: CartItemId) -> Result<()> {
        self.require_auth()?;
        let ticket = self.cart.begin();
        let result = self.api.remove_cart_item(id).await;
        match self.settle(result) {
            Ok(()) => {
                self.cart.removed(ticket, id);
                Ok(())
            }
            Err(e) => {
                self.cart.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn clear_cart(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.cart.begin();
        let result = self.api.clear_cart().await;
        match self.settle(result) {
            Ok(()) => {
                self.cart.cleared(ticket);
                Ok(())
            }
            Err(e) => {
                self.cart.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    /// Fetch the member's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn load_wishlist(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.wishlist.begin();
        let result = self.api.wishlist().await;
        match self.settle(result) {
            Ok(summary) => {
                self.wishlist.loaded(ticket, summary.wishlist_items);
                Ok(())
            }
            Err(e) => {
                self.wishlist.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Save `product`. Saving an already saved product sends no request.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&mut self, product: ProductId) -> Result<WishlistItem> {
        self.require_auth()?;
        if let Some(existing) = self.wishlist.entry_for(product) {
            debug!("Already in wishlist");
            return Ok(existing.clone());
        }

        let ticket = self.wishlist.begin();
        let result = self.api.add_wishlist_item(product).await;
        match self.settle(result) {
            Ok(item) => {
                self.wishlist.added(ticket, item.clone());
                Ok(item)
            }
            Err(e) => {
                self.wishlist.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Remove a wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&mut self, id: WishlistItemId) -> Result<()> {
        self.require_auth()?;
        let ticket = self.wishlist.begin();
        let result = self.api.remove_wishlist_item(id).await;
        match self.settle(result) {
            Ok(()) => {
                self.wishlist.removed(ticket, id);
                Ok(())
            }
            Err(e) => {
                self.wishlist.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Save `product` if it is not saved, otherwise remove it.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn toggle_wishlist(&mut self, product: ProductId) -> Result<WishlistToggle> {
        match self.wishlist.entry_for(product).map(|entry| entry.id) {
            Some(id) => {
                self.remove_from_wishlist(id).await?;
                Ok(WishlistToggle::Removed(product))
            }
            None => self
                .add_to_wishlist(product)
                .await
                .map(WishlistToggle::Added),
        }
    }

    /// Remove every wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn clear_wishlist(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.wishlist.begin();
        let result = self.api.clear_wishlist().await;
        match self.settle(result) {
            Ok(()) => {
                self.wishlist.cleared(ticket);
                Ok(())
            }
            Err(e) => {
                self.wishlist.failed(ticket, e.user_message());
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Checkout and orders
    // -------------------------------------------------------------------------

    /// Order everything in the cart.
    ///
    /// On success the order is kept as [`Self::last_order`] and the cart is
    /// refreshed from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, for an empty cart or incomplete
    /// delivery details, or if the order request fails. A failed cart
    /// refresh afterwards is logged but does not fail the checkout.
    #[instrument(skip(self, delivery))]
    pub async fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        delivery: DeliveryInfo,
    ) -> Result<Order> {
        self.require_auth()?;
        let request = checkout::build_order_request(self.cart.items(), payment_method, delivery)?;

        let result = self.api.create_order(&request).await;
        let order = self.settle(result)?;
        info!(order_id = %order.id, total = %order.total_price, "Order placed");
        let order_id = order.id.to_string();
        error::add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order_id.as_str())]),
        );

        self.last_order = Some(order.clone());
        if let Err(e) = self.load_cart().await {
            warn!(error = %e, "Cart refresh after checkout failed");
        }
        Ok(order)
    }

    /// Fetch the member's orders.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn load_my_orders(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.orders.begin();
        let result = self.api.my_orders().await;
        match self.settle(result) {
            Ok(orders) => {
                self.orders.fulfil(ticket, orders);
                Ok(())
            }
            Err(e) => {
                self.orders.reject(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn order(&mut self, id: OrderId) -> Result<Order> {
        self.require_auth()?;
        let result = self.api.order(id).await;
        self.settle(result)
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, if the order is known to be past
    /// cancellation, or if the request fails.
    #[instrument(skip(self))]
    pub async fn cancel_order(&mut self, id: OrderId) -> Result<Order> {
        self.require_auth()?;
        if let Some(known) = self.orders.data().iter().find(|order| order.id == id)
            && !known.order_status.is_cancellable()
        {
            return Err(AppError::Validation(format!(
                "order {id} is {} and can no longer be cancelled",
                known.order_status.label()
            )));
        }

        let ticket = self.orders.begin();
        let result = self.api.cancel_order(id).await;
        match self.settle(result) {
            Ok(order) => {
                let updated = order.clone();
                self.orders.fulfil_with(ticket, |orders| {
                    if let Some(slot) = orders.iter_mut().find(|o| o.id == updated.id) {
                        *slot = updated;
                    }
                });
                info!(order_id = %id, "Order cancelled");
                Ok(order)
            }
            Err(e) => {
                self.orders.reject(ticket, e.user_message());
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Reviews
    // -------------------------------------------------------------------------

    /// Reviews of one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn product_reviews(&mut self, product: ProductId) -> Result<ReviewSummary> {
        let result = self.api.product_reviews(product).await;
        self.settle(result)
    }

    /// Fetch the member's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    pub async fn load_my_reviews(&mut self) -> Result<()> {
        self.require_auth()?;
        let ticket = self.my_reviews.begin();
        let result = self.api.my_reviews().await;
        match self.settle(result) {
            Ok(reviews) => {
                self.my_reviews.fulfil(ticket, reviews);
                Ok(())
            }
            Err(e) => {
                self.my_reviews.reject(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Review a delivered order line.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, for a rating outside 1..=5 or
    /// blank content, or if the request fails.
    #[instrument(skip(self, content, image_url))]
    pub async fn write_review(
        &mut self,
        order_detail_id: OrderDetailId,
        rating: u8,
        content: &str,
        image_url: Option<String>,
    ) -> Result<Review> {
        self.require_auth()?;
        let request = reviews::new_review(order_detail_id, rating, content, image_url)?;

        let ticket = self.my_reviews.begin();
        let result = self.api.create_review(&request).await;
        match self.settle(result) {
            Ok(review) => {
                let created = review.clone();
                self.my_reviews
                    .fulfil_with(ticket, |reviews| reviews.insert(0, created));
                Ok(review)
            }
            Err(e) => {
                self.my_reviews.reject(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Delete one of the member's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_review(&mut self, id: ReviewId) -> Result<()> {
        self.require_auth()?;
        let ticket = self.my_reviews.begin();
        let result = self.api.delete_review(id).await;
        match self.settle(result) {
            Ok(()) => {
                self.my_reviews
                    .fulfil_with(ticket, |reviews| reviews.retain(|r| r.id != id));
                Ok(())
            }
            Err(e) => {
                self.my_reviews.reject(ticket, e.user_message());
                Err(e)
            }
        }
    }

    /// Lines of an order the member can still review.
    ///
    /// Fetches the order and the member's reviews.
    ///
    /// # Errors
    ///
    /// Returns an error without a session or if either request fails.
    pub async fn reviewable(&mut self, order_id: OrderId) -> Result<Vec<OrderDetail>> {
        let order = self.order(order_id).await?;
        self.load_my_reviews().await?;
        Ok(reviews::reviewable_details(&order, self.my_reviews.data())
            .into_iter()
            .cloned()
            .collect())
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to `path` after restoring the profile of a persisted
    /// session, so role guards see the member's roles.
    ///
    /// A failed profile fetch is logged and the guards run with what the
    /// session has.
    pub async fn open(&mut self, path: &str) -> RouteDecision {
        if let Err(e) = self.ensure_profile().await {
            debug!(error = %e, "Profile unavailable, guarding without roles");
        }
        self.navigate(path)
    }

    /// Navigate to `path`, applying the route guards.
    ///
    /// Uses the profile already loaded; see [`Self::open`] for a session
    /// restored from storage.
    pub fn navigate(&mut self, path: &str) -> RouteDecision {
        let decision = routes::guard(Route::parse(path), &self.session);
        let destination = decision.destination().path();
        error::add_breadcrumb(
            "navigation",
            "Navigated",
            Some(&[("path", path), ("destination", destination.as_str())]),
        );
        self.current_route = decision.destination().clone();
        decision
    }
}

fn ensure_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ))
    } else {
        Ok(())
    }
}
