//! Cart, wishlist, checkout, orders and reviews against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use fruit_mall_core::{OrderStatus, PaymentMethod, Price, ProductId};
use fruit_mall_integration_tests::FakeBackend;
use fruit_mall_integration_tests::fixtures::{MEMBER_PASSWORD, MEMBER_USERNAME};
use fruit_mall_storefront::api::DeliveryInfo;
use fruit_mall_storefront::state::WishlistToggle;
use fruit_mall_storefront::storage::MemoryTokenStore;
use fruit_mall_storefront::{AppContext, AppError};
use secrecy::SecretString;

async fn signed_in(backend: &FakeBackend) -> AppContext {
    let mut ctx = backend.context(MemoryTokenStore::default());
    ctx.login(MEMBER_USERNAME, &SecretString::from(MEMBER_PASSWORD))
        .await
        .unwrap();
    backend.clear_requests();
    ctx
}

fn delivery() -> DeliveryInfo {
    DeliveryInfo {
        recipient: "Kim Minji".to_string(),
        phone_number: "010-1234-5678".to_string(),
        zip_code: "06236".to_string(),
        address1: "Teheran-ro 152".to_string(),
        address2: "3F".to_string(),
        delivery_request: String::new(),
    }
}

#[tokio::test]
async fn test_cart_totals_follow_mutations() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;

    // Banana costs 5,000.
    let line = ctx.add_to_cart(ProductId::new(11), 3).await.unwrap();
    let totals = ctx.cart_totals();
    assert_eq!(totals.subtotal, Price::from_won(15_000));
    assert_eq!(totals.shipping_fee, Price::from_won(3_000));
    assert_eq!(totals.grand_total, Price::from_won(18_000));

    // Adding the same product again grows the existing line.
    ctx.add_to_cart(ProductId::new(11), 1).await.unwrap();
    assert_eq!(ctx.cart().items().len(), 1);
    assert_eq!(ctx.cart_totals().item_count, 4);

    // Shine Muscat (45,000) x 2 crosses the free-shipping threshold.
    let muscat = ctx.add_to_cart(ProductId::new(8), 2).await.unwrap();
    let totals = ctx.cart_totals();
    assert_eq!(totals.subtotal, Price::from_won(110_000));
    assert!(totals.shipping_fee.is_zero());

    ctx.remove_cart_item(muscat.id).await.unwrap();
    assert_eq!(ctx.cart_totals().item_count, 4);

    ctx.update_cart_quantity(line.id, 2).await.unwrap();
    assert_eq!(ctx.cart_totals().subtotal, Price::from_won(10_000));

    // The server's view agrees after a refetch.
    ctx.load_cart().await.unwrap();
    assert_eq!(ctx.cart_totals().subtotal, Price::from_won(10_000));

    assert!(matches!(
        ctx.update_cart_quantity(line.id, 0).await,
        Err(AppError::Validation(_))
    ));

    ctx.clear_cart().await.unwrap();
    assert!(ctx.cart_totals().is_empty());
}

#[tokio::test]
async fn test_failed_cart_request_keeps_items() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;
    ctx.add_to_cart(ProductId::new(11), 1).await.unwrap();

    // Raspberry is sold out.
    let err = ctx.add_to_cart(ProductId::new(7), 1).await.unwrap_err();
    assert_eq!(err.user_message(), "Out of stock");
    assert_eq!(ctx.cart().items().len(), 1);
    assert_eq!(ctx.cart().state().error(), Some("Out of stock"));
}

#[tokio::test]
async fn test_wishlist_never_duplicates() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;

    ctx.add_to_wishlist(ProductId::new(5)).await.unwrap();
    ctx.add_to_wishlist(ProductId::new(5)).await.unwrap();
    assert_eq!(ctx.wishlist().len(), 1);
    assert_eq!(backend.requests(), vec!["POST /api/wishlist"]);

    ctx.load_wishlist().await.unwrap();
    assert_eq!(ctx.wishlist().len(), 1);

    let toggled = ctx.toggle_wishlist(ProductId::new(5)).await.unwrap();
    assert_eq!(toggled, WishlistToggle::Removed(ProductId::new(5)));
    assert!(!ctx.wishlist().contains(ProductId::new(5)));

    let toggled = ctx.toggle_wishlist(ProductId::new(6)).await.unwrap();
    assert!(matches!(toggled, WishlistToggle::Added(item) if item.fruit_id == ProductId::new(6)));

    ctx.clear_wishlist().await.unwrap();
    assert!(ctx.wishlist().is_empty());
}

#[tokio::test]
async fn test_checkout_places_order_and_refreshes_cart() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;

    let err = ctx
        .checkout(PaymentMethod::Card, delivery())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));

    ctx.add_to_cart(ProductId::new(2), 2).await.unwrap();
    ctx.add_to_cart(ProductId::new(3), 1).await.unwrap();
    backend.clear_requests();

    let order = ctx
        .checkout(PaymentMethod::VirtualAccount, delivery())
        .await
        .unwrap();
    assert_eq!(order.total_price, Price::from_won(45_000));
    assert_eq!(order.order_details.len(), 2);
    assert_eq!(order.payment_method, PaymentMethod::VirtualAccount);
    assert_eq!(ctx.last_order(), Some(&order));
    assert!(ctx.cart().items().is_empty());
    assert_eq!(
        backend.requests(),
        vec!["POST /api/orders", "GET /api/cart"]
    );

    ctx.load_my_orders().await.unwrap();
    assert_eq!(ctx.orders().data().len(), 1);
    let fetched = ctx.order(order.id).await.unwrap();
    assert_eq!(fetched.order_status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_cancel_only_before_shipping() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;

    ctx.add_to_cart(ProductId::new(10), 1).await.unwrap();
    let first = ctx.checkout(PaymentMethod::Card, delivery()).await.unwrap();
    ctx.add_to_cart(ProductId::new(12), 1).await.unwrap();
    let second = ctx.checkout(PaymentMethod::Card, delivery()).await.unwrap();

    ctx.load_my_orders().await.unwrap();
    let cancelled = ctx.cancel_order(first.id).await.unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    let listed = ctx
        .orders()
        .data()
        .iter()
        .find(|o| o.id == first.id)
        .unwrap();
    assert_eq!(listed.order_status, OrderStatus::Cancelled);

    backend.set_order_status(second.id, OrderStatus::Shipped);
    ctx.load_my_orders().await.unwrap();
    backend.clear_requests();
    let err = ctx.cancel_order(second.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_review_lifecycle() {
    let backend = FakeBackend::start().await;
    let mut ctx = signed_in(&backend).await;

    ctx.add_to_cart(ProductId::new(1), 1).await.unwrap();
    ctx.add_to_cart(ProductId::new(9), 1).await.unwrap();
    let order = ctx.checkout(PaymentMethod::Card, delivery()).await.unwrap();

    // Nothing is reviewable until delivery.
    assert!(ctx.reviewable(order.id).await.unwrap().is_empty());

    backend.set_order_status(order.id, OrderStatus::Delivered);
    let lines = ctx.reviewable(order.id).await.unwrap();
    assert_eq!(lines.len(), 2);

    let mango = lines
        .iter()
        .find(|line| line.fruit_id == ProductId::new(9))
        .unwrap();
    let review = ctx
        .write_review(mango.id, 4, "  Sweet and ripe ", None)
        .await
        .unwrap();
    assert_eq!(review.content, "Sweet and ripe");
    assert_eq!(ctx.my_reviews().data().len(), 1);

    let lines = ctx.reviewable(order.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].fruit_id, ProductId::new(1));

    let summary = ctx.product_reviews(ProductId::new(9)).await.unwrap();
    assert_eq!(summary.review_count, 1);
    assert!((summary.average_rating - 4.0).abs() < f64::EPSILON);

    ctx.delete_review(review.id).await.unwrap();
    assert!(ctx.my_reviews().data().is_empty());
    assert_eq!(ctx.reviewable(order.id).await.unwrap().len(), 2);
}
