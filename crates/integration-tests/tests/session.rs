//! Sign-in, persisted sessions, expiry and route guards.

#![allow(clippy::unwrap_used)]

use fruit_mall_integration_tests::FakeBackend;
use fruit_mall_integration_tests::fixtures::{
    ADMIN_PASSWORD, ADMIN_USERNAME, MEMBER_PASSWORD, MEMBER_USERNAME,
};
use fruit_mall_storefront::api::{ApiError, RegisterRequest};
use fruit_mall_storefront::routes::{Route, RouteDecision};
use fruit_mall_storefront::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use fruit_mall_storefront::{AppContext, AppError};
use secrecy::SecretString;

fn password(p: &str) -> SecretString {
    SecretString::from(p)
}

#[tokio::test]
async fn test_login_persists_token_across_restarts() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("storage.json");

    let mut ctx = AppContext::start(backend.config(token_path.clone())).unwrap();
    assert!(!ctx.session().is_authenticated());

    let user = ctx
        .login(MEMBER_USERNAME, &password(MEMBER_PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.username, MEMBER_USERNAME);
    assert_eq!(ctx.session().user(), Some(&user));
    ctx.shutdown();

    // A fresh start is authenticated from storage before any request.
    backend.clear_requests();
    let mut ctx = AppContext::start(backend.config(token_path)).unwrap();
    assert!(ctx.session().is_authenticated());
    assert!(ctx.session().user().is_none());
    assert!(backend.requests().is_empty());

    let user = ctx.fetch_current_user().await.unwrap();
    assert_eq!(user.username, MEMBER_USERNAME);
    assert_eq!(backend.requests(), vec!["GET /api/members/me"]);
}

#[tokio::test]
async fn test_wrong_password_shows_backend_message() {
    let backend = FakeBackend::start().await;
    let store = MemoryTokenStore::default();
    let mut ctx = backend.context(store.clone());

    let err = ctx
        .login(MEMBER_USERNAME, &password("wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Incorrect password");
    assert!(!ctx.session().is_authenticated());
    assert!(!store.is_set());
}

#[tokio::test]
async fn test_unknown_user_shows_backend_message() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    let err = ctx
        .login("nobody_here", &password(MEMBER_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        AppError::Api(ApiError::NotFound { message: Some(_), .. })
    ));
    assert_eq!(err.user_message(), "Member not found");
}

#[tokio::test]
async fn test_restored_admin_session_reaches_admin_routes() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("storage.json");

    let mut ctx = AppContext::start(backend.config(token_path.clone())).unwrap();
    ctx.login(ADMIN_USERNAME, &password(ADMIN_PASSWORD))
        .await
        .unwrap();
    ctx.shutdown();

    let mut ctx = AppContext::start(backend.config(token_path)).unwrap();
    assert!(ctx.session().user().is_none());
    backend.clear_requests();

    assert_eq!(
        ctx.open("/admin/orders").await,
        RouteDecision::Allow(Route::Admin("orders".to_string()))
    );
    assert!(ctx.session().is_admin());
    assert_eq!(backend.requests(), vec!["GET /api/members/me"]);

    // The profile is loaded now, so later navigation needs no request.
    ctx.open("/admin/members").await;
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_response_ends_session() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("storage.json"));
    let mut ctx = backend.context(store.clone());

    ctx.login(MEMBER_USERNAME, &password(MEMBER_PASSWORD))
        .await
        .unwrap();
    ctx.add_to_cart(fruit_mall_core::ProductId::new(2), 1)
        .await
        .unwrap();
    assert_eq!(ctx.cart().items().len(), 1);

    backend.expire_sessions();
    let err = ctx.load_cart().await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Unauthorized)));

    assert!(!ctx.session().is_authenticated());
    assert!(ctx.cart().items().is_empty());
    assert!(store.load().unwrap().is_none());
    assert_eq!(err.user_message(), "Please sign in to continue.");
}

#[tokio::test]
async fn test_logout_clears_member_state() {
    let backend = FakeBackend::start().await;
    let store = MemoryTokenStore::default();
    let mut ctx = backend.context(store.clone());

    ctx.login(MEMBER_USERNAME, &password(MEMBER_PASSWORD))
        .await
        .unwrap();
    ctx.add_to_wishlist(fruit_mall_core::ProductId::new(5))
        .await
        .unwrap();
    assert!(store.is_set());

    ctx.logout().unwrap();
    assert!(!store.is_set());
    assert!(!ctx.session().is_authenticated());
    assert!(ctx.wishlist().is_empty());
    assert!(matches!(
        ctx.load_wishlist().await,
        Err(AppError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_register_reports_backend_rejections() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    let request = RegisterRequest {
        username: "lee_jiwoo".to_string(),
        email: "lee@fruitmall.com".to_string(),
        password: "s3cret!pass".to_string(),
        name: "Lee Jiwoo".to_string(),
        phone_number: "010-2222-3333".to_string(),
        ..RegisterRequest::default()
    };
    let user = ctx.register(request.clone()).await.unwrap();
    assert_eq!(user.username, "lee_jiwoo");
    // Registering does not sign in.
    assert!(!ctx.session().is_authenticated());

    let err = ctx.register(request.clone()).await.unwrap_err();
    assert_eq!(err.user_message(), "Username is already in use");

    let same_email = RegisterRequest {
        username: "lee_second".to_string(),
        ..request.clone()
    };
    let err = ctx.register(same_email).await.unwrap_err();
    assert_eq!(err.user_message(), "Email is already in use");

    let malformed = RegisterRequest {
        username: "lee jiwoo!".to_string(),
        email: "other@fruitmall.com".to_string(),
        password: "password".to_string(),
        ..request
    };
    let err = ctx.register(malformed).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Validation failed (password: 8 or more characters mixing letters, digits and symbols, \
         username: 4 to 20 letters, digits or underscores)"
    );

    let bad_email = RegisterRequest {
        username: "park".to_string(),
        email: "park-at-fruitmall".to_string(),
        password: "pw".to_string(),
        name: "Park".to_string(),
        phone_number: "010-1111-2222".to_string(),
        ..RegisterRequest::default()
    };
    backend.clear_requests();
    assert!(matches!(
        ctx.register(bad_email).await,
        Err(AppError::Validation(_))
    ));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_route_guards_follow_session() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(MemoryTokenStore::default());

    assert_eq!(ctx.navigate("/my-page/orders").destination(), &Route::Login);
    assert_eq!(ctx.navigate("/admin/members").destination(), &Route::Home);
    assert_eq!(
        ctx.navigate("/products"),
        RouteDecision::Allow(Route::Products)
    );

    ctx.login(MEMBER_USERNAME, &password(MEMBER_PASSWORD))
        .await
        .unwrap();
    assert_eq!(
        ctx.navigate("/my-page/orders"),
        RouteDecision::Allow(Route::MyOrders)
    );
    assert_eq!(ctx.navigate("/admin/members").destination(), &Route::Home);

    ctx.logout().unwrap();
    ctx.login(ADMIN_USERNAME, &password(ADMIN_PASSWORD))
        .await
        .unwrap();
    assert!(ctx.session().is_admin());
    assert_eq!(
        ctx.navigate("/admin/members"),
        RouteDecision::Allow(Route::Admin("members".to_string()))
    );
}
