//! In-process fake of the Fruit Mall REST backend.
//!
//! Speaks the same camelCase JSON and `{status, code, message, errors}`
//! error bodies as the real service, keeps everything in memory, and
//! records every request it receives.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use fruit_mall_core::{
    CartItemId, MemberId, OrderDetailId, OrderId, OrderStatus, PaymentMethod, Price, ProductId,
    ReviewId, Role, WishlistItemId,
};
use fruit_mall_storefront::api::{
    CartItem, Category, CurrentUser, DeliveryInfo, Order, OrderDetail, Product, Review,
    WishlistItem,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// A registered member and their password.
#[derive(Debug, Clone)]
pub struct Member {
    pub user: CurrentUser,
    pub password: String,
}

/// A review together with its author.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub member: MemberId,
    pub order_detail: OrderDetailId,
    pub review: Review,
}

/// Everything the fake backend knows.
#[derive(Debug, Default)]
pub struct BackendData {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub members: Vec<Member>,
    /// Issued bearer tokens.
    pub sessions: HashMap<String, MemberId>,
    pub cart: Vec<CartItem>,
    pub wishlist: Vec<WishlistItem>,
    pub orders: Vec<Order>,
    pub reviews: Vec<StoredReview>,
    /// `METHOD /path` of every request received, in order.
    pub requests: Vec<String>,
    /// `METHOD /path` of requests to answer once with a server error.
    pub failures: Vec<String>,
    /// Timestamp stamped on everything created.
    pub now: NaiveDateTime,
    sequence: i64,
}

impl BackendData {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        1000 + self.sequence
    }

    fn product(&self, id: ProductId) -> Result<&Product, Failure> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Failure::new(ErrorCode::FruitNotFound))
    }

    fn member(&self, headers: &HeaderMap) -> Result<MemberId, Failure> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.sessions.get(token).copied())
            .ok_or_else(Failure::unauthorized)
    }
}

/// Shared handle to the backend data.
#[derive(Clone, Default)]
pub struct Backend {
    data: Arc<Mutex<BackendData>>,
}

impl Backend {
    #[must_use]
    pub fn new(data: BackendData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Lock the backend data.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The backend's error codes, with their HTTP statuses and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInputValue,
    EntityNotFound,
    InternalServerError,
    AccessDenied,
    MemberNotFound,
    EmailDuplication,
    UsernameDuplication,
    InvalidPassword,
    FruitNotFound,
    OutOfStock,
    OrderNotFound,
    CannotCancelOrder,
    ReviewNotFound,
    AlreadyReviewed,
}

impl ErrorCode {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::EntityNotFound
            | Self::MemberNotFound
            | Self::FruitNotFound
            | Self::OrderNotFound
            | Self::ReviewNotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::InvalidInputValue
            | Self::EmailDuplication
            | Self::UsernameDuplication
            | Self::InvalidPassword
            | Self::OutOfStock
            | Self::CannotCancelOrder
            | Self::AlreadyReviewed => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidInputValue => "COMMON-001",
            Self::EntityNotFound => "COMMON-003",
            Self::InternalServerError => "COMMON-004",
            Self::AccessDenied => "COMMON-006",
            Self::MemberNotFound => "MEMBER-001",
            Self::EmailDuplication => "MEMBER-002",
            Self::UsernameDuplication => "MEMBER-003",
            Self::InvalidPassword => "MEMBER-004",
            Self::FruitNotFound => "FRUIT-001",
            Self::OutOfStock => "FRUIT-002",
            Self::OrderNotFound => "ORDER-001",
            Self::CannotCancelOrder => "ORDER-002",
            Self::ReviewNotFound => "REVIEW-001",
            Self::AlreadyReviewed => "REVIEW-002",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidInputValue => "Invalid input value",
            Self::EntityNotFound => "Entity not found",
            Self::InternalServerError => "Internal server error",
            Self::AccessDenied => "Access denied",
            Self::MemberNotFound => "Member not found",
            Self::EmailDuplication => "Email is already in use",
            Self::UsernameDuplication => "Username is already in use",
            Self::InvalidPassword => "Incorrect password",
            Self::FruitNotFound => "Fruit not found",
            Self::OutOfStock => "Out of stock",
            Self::OrderNotFound => "Order not found",
            Self::CannotCancelOrder => "Order cannot be cancelled",
            Self::ReviewNotFound => "Review not found",
            Self::AlreadyReviewed => "Already reviewed",
        }
    }
}

/// An error response in the backend's format.
#[derive(Debug)]
pub enum Failure {
    /// `401` with no body, as the security filter answers.
    Unauthorized,
    /// A coded error body.
    Coded {
        code: ErrorCode,
        message: String,
        errors: Option<BTreeMap<String, String>>,
    },
}

impl Failure {
    fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
            errors: None,
        }
    }

    /// Bean validation failure with per-field messages.
    fn invalid(errors: BTreeMap<String, String>) -> Self {
        Self::Coded {
            code: ErrorCode::InvalidInputValue,
            message: "Validation failed".to_string(),
            errors: Some(errors),
        }
    }

    const fn unauthorized() -> Self {
        Self::Unauthorized
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Coded {
                code,
                message,
                errors,
            } => {
                let body = json!({
                    "timestamp": "2024-01-01T00:00:00",
                    "status": code.status().as_u16(),
                    "code": code.code(),
                    "message": message,
                    "errors": errors,
                });
                (code.status(), Json(body)).into_response()
            }
        }
    }
}

type Reply<T> = Result<T, Failure>;

/// Router serving the backend under `/api`.
pub fn router(backend: Backend) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/members/me", get(me))
        .route("/api/members/{id}", put(update_member))
        .route("/api/members/{id}/password", put(change_password))
        .route("/api/fruits", get(list_fruits))
        .route("/api/fruits/search", get(search_fruits))
        .route("/api/fruits/category/{id}", get(fruits_by_category))
        .route("/api/fruits/{id}", get(fruit))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/{id}", get(category))
        .route("/api/cart", get(cart).post(add_cart_item).delete(clear_cart))
        .route(
            "/api/cart/{id}",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route(
            "/api/wishlist",
            get(wishlist).post(add_wishlist_item).delete(clear_wishlist),
        )
        .route(
            "/api/wishlist/{id}",
            delete(remove_wishlist_item),
        )
        .route("/api/orders", post(create_order))
        .route("/api/orders/my-orders", get(my_orders))
        .route("/api/orders/{id}", get(order))
        .route("/api/orders/{id}/cancel", put(cancel_order))
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/my-reviews", get(my_reviews))
        .route("/api/reviews/fruit/{id}", get(fruit_reviews))
        .route("/api/reviews/{id}", delete(delete_review))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

async fn record(State(backend): State<Backend>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    let injected = {
        let mut data = backend.data();
        let injected = data.failures.iter().position(|f| *f == line);
        if let Some(index) = injected {
            data.failures.remove(index);
        }
        data.requests.push(line);
        injected.is_some()
    };
    if injected {
        return Failure::new(ErrorCode::InternalServerError).into_response();
    }
    next.run(request).await
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    username_or_email: String,
    password: String,
}

async fn login(State(backend): State<Backend>, Json(body): Json<LoginBody>) -> Reply<Json<Value>> {
    let mut data = backend.data();
    let member = data
        .members
        .iter()
        .find(|m| {
            m.user.username == body.username_or_email || m.user.email == body.username_or_email
        })
        .ok_or_else(|| Failure::new(ErrorCode::MemberNotFound))?;
    if member.password != body.password {
        return Err(Failure::new(ErrorCode::InvalidPassword));
    }

    let member = member.user.id;
    let token = format!("token-{}", data.next_id());
    data.sessions.insert(token.clone(), member);
    Ok(Json(json!({
        "token": token,
        "tokenType": "Bearer",
        "expiresIn": 86_400_000,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    username: String,
    email: String,
    password: String,
    name: String,
    phone_number: String,
    address: Option<String>,
}

const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

fn valid_username(username: &str) -> bool {
    (4..=20).contains(&username.chars().count())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

async fn register(
    State(backend): State<Backend>,
    Json(body): Json<RegisterBody>,
) -> Reply<(StatusCode, Json<CurrentUser>)> {
    let mut errors = BTreeMap::new();
    if !valid_username(&body.username) {
        errors.insert(
            "username".to_string(),
            "4 to 20 letters, digits or underscores".to_string(),
        );
    }
    if !valid_password(&body.password) {
        errors.insert(
            "password".to_string(),
            "8 or more characters mixing letters, digits and symbols".to_string(),
        );
    }
    if !errors.is_empty() {
        return Err(Failure::invalid(errors));
    }

    let mut data = backend.data();
    if data.members.iter().any(|m| m.user.username == body.username) {
        return Err(Failure::new(ErrorCode::UsernameDuplication));
    }
    if data.members.iter().any(|m| m.user.email == body.email) {
        return Err(Failure::new(ErrorCode::EmailDuplication));
    }

    let user = CurrentUser {
        id: MemberId::new(data.next_id()),
        username: body.username,
        email: body.email,
        name: body.name,
        phone_number: Some(body.phone_number),
        address: body.address,
        roles: vec![Role::User],
    };
    data.members.push(Member {
        user: user.clone(),
        password: body.password,
    });
    Ok((StatusCode::CREATED, Json(user)))
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> Reply<Json<CurrentUser>> {
    let data = backend.data();
    let id = data.member(&headers)?;
    data.members
        .iter()
        .find(|m| m.user.id == id)
        .map(|m| Json(m.user.clone()))
        .ok_or_else(Failure::unauthorized)
}

/// The member `id` names, if the caller is that member or an admin.
fn editable_member<'a>(
    data: &'a mut BackendData,
    headers: &HeaderMap,
    id: i64,
) -> Reply<&'a mut Member> {
    let caller = data.member(headers)?;
    let admin = data
        .members
        .iter()
        .any(|m| m.user.id == caller && m.user.roles.contains(&Role::Admin));
    if caller.as_i64() != id && !admin {
        return Err(Failure::new(ErrorCode::AccessDenied));
    }
    data.members
        .iter_mut()
        .find(|m| m.user.id.as_i64() == id)
        .ok_or_else(|| Failure::new(ErrorCode::MemberNotFound))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMemberBody {
    name: String,
    phone_number: Option<String>,
    address: Option<String>,
}

async fn update_member(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMemberBody>,
) -> Reply<Json<CurrentUser>> {
    let mut data = backend.data();
    let member = editable_member(&mut data, &headers, id)?;
    member.user.name = body.name;
    member.user.phone_number = body.phone_number;
    member.user.address = body.address;
    Ok(Json(member.user.clone()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody {
    current_password: String,
    new_password: String,
}

async fn change_password(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<ChangePasswordBody>,
) -> Reply<StatusCode> {
    if !valid_password(&body.new_password) {
        return Err(Failure::invalid(BTreeMap::from([(
            "newPassword".to_string(),
            "8 or more characters mixing letters, digits and symbols".to_string(),
        )])));
    }
    let mut data = backend.data();
    let member = editable_member(&mut data, &headers, id)?;
    if member.password != body.current_password {
        return Err(Failure::new(ErrorCode::InvalidPassword));
    }
    member.password = body.new_password;
    Ok(StatusCode::OK)
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_fruits(State(backend): State<Backend>) -> Json<Vec<Product>> {
    Json(backend.data().products.clone())
}

async fn fruit(State(backend): State<Backend>, Path(id): Path<i64>) -> Reply<Json<Product>> {
    backend
        .data()
        .product(ProductId::new(id))
        .map(|p| Json(p.clone()))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    keyword: String,
}

async fn search_fruits(
    State(backend): State<Backend>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Product>> {
    let keyword = params.keyword.to_lowercase();
    let matches = backend
        .data()
        .products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&keyword))
        .cloned()
        .collect();
    Json(matches)
}

async fn fruits_by_category(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> Json<Vec<Product>> {
    let matches = backend
        .data()
        .products
        .iter()
        .filter(|p| p.category_id.as_i64() == id)
        .cloned()
        .collect();
    Json(matches)
}

async fn list_categories(State(backend): State<Backend>) -> Json<Vec<Category>> {
    Json(backend.data().categories.clone())
}

async fn category(State(backend): State<Backend>, Path(id): Path<i64>) -> Reply<Json<Category>> {
    backend
        .data()
        .categories
        .iter()
        .find(|c| c.id.as_i64() == id)
        .map(|c| Json(c.clone()))
        .ok_or_else(|| Failure::new(ErrorCode::EntityNotFound))
}

// =============================================================================
// Cart
// =============================================================================

async fn cart(State(backend): State<Backend>, headers: HeaderMap) -> Reply<Json<Value>> {
    let data = backend.data();
    let member = data.member(&headers)?;
    let items: Vec<&CartItem> = data
        .cart
        .iter()
        .filter(|item| item.member_id == Some(member))
        .collect();
    let total: Price = items.iter().map(|item| item.line_total()).sum();
    Ok(Json(json!({
        "cartItems": items,
        "totalPrice": total,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCartBody {
    fruit_id: ProductId,
    quantity: u32,
}

async fn add_cart_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<AddCartBody>,
) -> Reply<Json<CartItem>> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let product = data.product(body.fruit_id)?.clone();

    let existing = data
        .cart
        .iter()
        .find(|item| item.member_id == Some(member) && item.fruit_id == body.fruit_id)
        .map(|item| item.quantity)
        .unwrap_or_default();
    let quantity = existing + body.quantity;
    if i64::from(quantity) > product.stock_quantity {
        return Err(Failure::new(ErrorCode::OutOfStock));
    }

    if let Some(item) = data
        .cart
        .iter_mut()
        .find(|item| item.member_id == Some(member) && item.fruit_id == body.fruit_id)
    {
        item.quantity = quantity;
        return Ok(Json(item.clone()));
    }

    let item = CartItem {
        id: CartItemId::new(data.next_id()),
        member_id: Some(member),
        fruit_id: product.id,
        fruit_name: product.name,
        fruit_image_url: product.image_url,
        fruit_price: product.price,
        quantity,
        added_date: Some(data.now),
    };
    data.cart.push(item.clone());
    Ok(Json(item))
}

#[derive(Deserialize)]
struct UpdateCartBody {
    quantity: u32,
}

async fn update_cart_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCartBody>,
) -> Reply<Json<CartItem>> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let item = data
        .cart
        .iter_mut()
        .find(|item| item.id.as_i64() == id && item.member_id == Some(member))
        .ok_or_else(|| Failure::new(ErrorCode::EntityNotFound))?;
    item.quantity = body.quantity;
    Ok(Json(item.clone()))
}

async fn remove_cart_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<StatusCode> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let before = data.cart.len();
    data.cart
        .retain(|item| !(item.id.as_i64() == id && item.member_id == Some(member)));
    if data.cart.len() == before {
        return Err(Failure::new(ErrorCode::EntityNotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_cart(State(backend): State<Backend>, headers: HeaderMap) -> Reply<StatusCode> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    data.cart.retain(|item| item.member_id != Some(member));
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Wishlist
// =============================================================================

async fn wishlist(State(backend): State<Backend>, headers: HeaderMap) -> Reply<Json<Value>> {
    let data = backend.data();
    let member = data.member(&headers)?;
    let items: Vec<&WishlistItem> = data
        .wishlist
        .iter()
        .filter(|item| item.member_id == Some(member))
        .collect();
    Ok(Json(json!({
        "wishlistItems": items,
        "totalCount": items.len(),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddWishlistBody {
    fruit_id: ProductId,
}

async fn add_wishlist_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<AddWishlistBody>,
) -> Reply<(StatusCode, Json<WishlistItem>)> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let product = data.product(body.fruit_id)?.clone();
    if data
        .wishlist
        .iter()
        .any(|item| item.member_id == Some(member) && item.fruit_id == body.fruit_id)
    {
        return Err(Failure::with_message(
            ErrorCode::InvalidInputValue,
            "Fruit is already in the wishlist",
        ));
    }

    let item = WishlistItem {
        id: WishlistItemId::new(data.next_id()),
        member_id: Some(member),
        fruit_id: product.id,
        fruit_name: product.name,
        fruit_image_url: product.image_url,
        fruit_price: product.price,
        stock_quantity: product.stock_quantity,
        origin: product.origin,
        season: product.season,
        added_date: Some(data.now),
    };
    data.wishlist.push(item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_wishlist_item(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<StatusCode> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let before = data.wishlist.len();
    data.wishlist
        .retain(|item| !(item.id.as_i64() == id && item.member_id == Some(member)));
    if data.wishlist.len() == before {
        return Err(Failure::new(ErrorCode::EntityNotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_wishlist(State(backend): State<Backend>, headers: HeaderMap) -> Reply<StatusCode> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    data.wishlist.retain(|item| item.member_id != Some(member));
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemBody {
    fruit_id: ProductId,
    quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody {
    order_items: Vec<OrderItemBody>,
    payment_method: PaymentMethod,
    delivery_info: DeliveryInfo,
}

async fn create_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<CreateOrderBody>,
) -> Reply<(StatusCode, Json<Order>)> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    if body.order_items.is_empty() {
        return Err(Failure::invalid(BTreeMap::from([(
            "orderItems".to_string(),
            "must not be empty".to_string(),
        )])));
    }
    if body.delivery_info.recipient.is_empty() {
        return Err(Failure::invalid(BTreeMap::from([(
            "deliveryInfo.recipient".to_string(),
            "must not be blank".to_string(),
        )])));
    }

    let order_id = OrderId::new(data.next_id());
    let mut details = Vec::with_capacity(body.order_items.len());
    for line in &body.order_items {
        let product = data.product(line.fruit_id)?.clone();
        let unit_price = product.price;
        details.push(OrderDetail {
            id: OrderDetailId::new(data.next_id()),
            order_id,
            fruit_id: product.id,
            fruit_name: product.name,
            fruit_image_url: product.image_url,
            quantity: line.quantity,
            unit_price,
            total_price: unit_price.times(line.quantity),
        });
    }

    let order = Order {
        id: order_id,
        member_id: Some(member),
        member_name: None,
        order_date: data.now,
        total_price: details.iter().map(|d| d.total_price).sum(),
        payment_method: body.payment_method,
        order_status: OrderStatus::Pending,
        order_details: details,
    };

    // Ordered products leave the cart.
    let ordered: Vec<ProductId> = body.order_items.iter().map(|l| l.fruit_id).collect();
    data.cart
        .retain(|item| !(item.member_id == Some(member) && ordered.contains(&item.fruit_id)));
    data.orders.push(order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

async fn my_orders(State(backend): State<Backend>, headers: HeaderMap) -> Reply<Json<Vec<Order>>> {
    let data = backend.data();
    let member = data.member(&headers)?;
    let mut orders: Vec<Order> = data
        .orders
        .iter()
        .filter(|order| order.member_id == Some(member))
        .cloned()
        .collect();
    orders.reverse();
    Ok(Json(orders))
}

fn member_order<'a>(data: &'a mut BackendData, member: MemberId, id: i64) -> Reply<&'a mut Order> {
    data.orders
        .iter_mut()
        .find(|order| order.id.as_i64() == id && order.member_id == Some(member))
        .ok_or_else(|| Failure::new(ErrorCode::OrderNotFound))
}

async fn order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<Json<Order>> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    member_order(&mut data, member, id).map(|order| Json(order.clone()))
}

async fn cancel_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<Json<Order>> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let order = member_order(&mut data, member, id)?;
    if !order.order_status.is_cancellable() {
        return Err(Failure::new(ErrorCode::CannotCancelOrder));
    }
    order.order_status = OrderStatus::Cancelled;
    Ok(Json(order.clone()))
}

// =============================================================================
// Reviews
// =============================================================================

async fn fruit_reviews(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> Reply<Json<Value>> {
    let data = backend.data();
    let product = data.product(ProductId::new(id))?;
    let reviews: Vec<&Review> = data
        .reviews
        .iter()
        .map(|stored| &stored.review)
        .filter(|review| review.fruit_id == product.id)
        .collect();
    let count = reviews.len();
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let average = match u32::try_from(count) {
        Ok(0) | Err(_) => 0.0,
        Ok(n) => f64::from(total) / f64::from(n),
    };
    Ok(Json(json!({
        "fruitId": product.id,
        "fruitName": product.name,
        "averageRating": average,
        "reviewCount": count,
        "reviews": reviews,
    })))
}

async fn my_reviews(State(backend): State<Backend>, headers: HeaderMap) -> Reply<Json<Vec<Review>>> {
    let data = backend.data();
    let member = data.member(&headers)?;
    Ok(Json(
        data.reviews
            .iter()
            .filter(|stored| stored.member == member)
            .map(|stored| stored.review.clone())
            .collect(),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReviewBody {
    order_detail_id: OrderDetailId,
    rating: u8,
    content: String,
    image_url: Option<String>,
}

async fn create_review(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<CreateReviewBody>,
) -> Reply<(StatusCode, Json<Review>)> {
    let mut data = backend.data();
    let member = data.member(&headers)?;

    let (order_status, detail) = data
        .orders
        .iter()
        .filter(|order| order.member_id == Some(member))
        .find_map(|order| {
            order
                .order_details
                .iter()
                .find(|d| d.id == body.order_detail_id)
                .map(|d| (order.order_status, d.clone()))
        })
        .ok_or_else(|| Failure::with_message(ErrorCode::EntityNotFound, "Order detail not found"))?;

    if order_status != OrderStatus::Delivered {
        return Err(Failure::with_message(
            ErrorCode::InvalidInputValue,
            "Only delivered orders can be reviewed",
        ));
    }
    if data
        .reviews
        .iter()
        .any(|stored| stored.order_detail == detail.id)
    {
        return Err(Failure::new(ErrorCode::AlreadyReviewed));
    }

    let review = Review {
        id: ReviewId::new(data.next_id()),
        order_id: detail.order_id,
        fruit_id: detail.fruit_id,
        fruit_name: detail.fruit_name,
        fruit_image_url: detail.fruit_image_url,
        rating: body.rating,
        content: body.content,
        review_date: data.now,
        image_url: body.image_url,
    };
    data.reviews.push(StoredReview {
        member,
        order_detail: detail.id,
        review: review.clone(),
    });
    Ok((StatusCode::CREATED, Json(review)))
}

async fn delete_review(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<StatusCode> {
    let mut data = backend.data();
    let member = data.member(&headers)?;
    let before = data.reviews.len();
    data.reviews
        .retain(|stored| !(stored.review.id.as_i64() == id && stored.member == member));
    if data.reviews.len() == before {
        return Err(Failure::new(ErrorCode::ReviewNotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
