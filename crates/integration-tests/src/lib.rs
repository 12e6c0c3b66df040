//! Integration tests for the Fruit Mall storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fruit-mall-integration-tests
//! ```
//!
//! Each test starts a [`FakeBackend`] on an ephemeral local port and drives
//! an [`AppContext`] against it, so nothing outside the process is needed.
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = FakeBackend::start().await;
//! let mut ctx = backend.context(MemoryTokenStore::default());
//! ctx.load_products().await?;
//! assert_eq!(backend.requests(), vec!["GET /api/fruits"]);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod fixtures;

use std::path::PathBuf;
use std::sync::MutexGuard;

use fruit_mall_core::{OrderId, OrderStatus};
use fruit_mall_storefront::AppContext;
use fruit_mall_storefront::config::StorefrontConfig;
use fruit_mall_storefront::storage::TokenStore;
use tokio::task::JoinHandle;
use url::Url;

pub use backend::{Backend, BackendData, ErrorCode};

/// A fake backend serving on `127.0.0.1`.
///
/// The server stops when this value is dropped.
pub struct FakeBackend {
    base_url: Url,
    backend: Backend,
    server: JoinHandle<()>,
}

impl FakeBackend {
    /// Serve the seeded catalog and members.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::with_data(BackendData::seeded()).await
    }

    /// Serve `data`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_data(data: BackendData) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let base_url = Url::parse(&format!("http://{addr}/api")).expect("fake backend URL");

        let backend = Backend::new(data);
        let app = backend::router(backend.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url,
            backend,
            server,
        }
    }

    /// Base URL of the API, ending in `/api`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Storefront configuration pointing at this backend.
    #[must_use]
    pub fn config(&self, token_path: PathBuf) -> StorefrontConfig {
        StorefrontConfig::new(self.base_url.clone(), token_path)
    }

    /// A storefront context using `store` for the session token.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be built.
    pub fn context(&self, store: impl TokenStore + 'static) -> AppContext {
        let config = self.config(PathBuf::from("unused-storage.json"));
        AppContext::with_token_store(config, Box::new(store)).expect("start storefront context")
    }

    /// Lock the backend data for inspection or changes.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        self.backend.data()
    }

    /// Requests received so far, as `METHOD /path`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.data().requests.clone()
    }

    /// Forget every request received so far.
    pub fn clear_requests(&self) {
        self.data().requests.clear();
    }

    /// Answer the next `METHOD /path` request with a `500`.
    pub fn fail_once(&self, request: &str) {
        self.data().failures.push(request.to_string());
    }

    /// Revoke every issued token, as if they had expired.
    pub fn expire_sessions(&self) {
        self.data().sessions.clear();
    }

    /// Move an order to another status, as fulfilment would.
    pub fn set_order_status(&self, id: OrderId, status: OrderStatus) {
        if let Some(order) = self.data().orders.iter_mut().find(|o| o.id == id) {
            order.order_status = status;
        }
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
