//! Client-side stores.
//!
//! Each store caches one backend resource and moves through
//! idle → loading → loaded | failed as requests settle. A request is
//! identified by a [`RequestTicket`]; only the most recently issued ticket
//! may settle a store, so a slow response can never overwrite a newer one.
//! A failed request keeps the previous data and only changes the status.
//!
//! [`AppContext`](crate::AppContext) takes `&mut self` for every request, so
//! the requests it issues never overlap and each ticket it begins settles
//! before the next one is issued. Tickets matter to front ends that keep
//! the stores themselves and issue requests concurrently through clones of
//! [`ApiClient`](crate::api::ApiClient): call the store's `begin_*` method
//! when the request is sent and its `*_loaded` or `*_failed` method when it
//! returns, in whatever order responses arrive.

mod cart;
mod catalog;
mod session;
mod wishlist;

pub use cart::CartStore;
pub use catalog::{CatalogSource, CatalogStore};
pub use session::SessionStore;
pub use wishlist::{WishlistStore, WishlistToggle};

use tracing::debug;

/// Status of a store's most recent request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request succeeded.
    Loaded,
    /// The last request failed with a user-facing message.
    Failed(String),
}

/// Identifies one request against a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Data plus the status of the request that produced it.
#[derive(Debug, Clone, Default)]
pub struct Loadable<T> {
    data: T,
    status: LoadStatus,
    issued: u64,
}

impl<T> Loadable<T> {
    /// An idle store holding `data`.
    pub const fn new(data: T) -> Self {
        Self {
            data,
            status: LoadStatus::Idle,
            issued: 0,
        }
    }

    /// Current data. Unchanged by failed requests.
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Status of the latest request.
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Whether a request is outstanding.
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }

    /// Error message of the latest request, if it failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start a request. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.status = LoadStatus::Loading;
        RequestTicket(self.issued)
    }

    /// Whether `ticket` is the latest one issued.
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Settle `ticket` successfully by replacing the data.
    ///
    /// Returns `false` and leaves the store untouched if the ticket is stale.
    pub fn fulfil(&mut self, ticket: RequestTicket, data: T) -> bool {
        self.fulfil_with(ticket, |current| *current = data)
    }

    /// Settle `ticket` successfully by editing the data in place.
    ///
    /// Returns `false` and leaves the store untouched if the ticket is stale.
    pub fn fulfil_with(&mut self, ticket: RequestTicket, apply: impl FnOnce(&mut T)) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.issued, "Discarding stale response");
            return false;
        }
        apply(&mut self.data);
        self.status = LoadStatus::Loaded;
        true
    }

    /// Settle `ticket` as failed. The data is kept.
    ///
    /// Returns `false` and leaves the store untouched if the ticket is stale.
    pub fn reject(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.issued, "Discarding stale failure");
            return false;
        }
        self.status = LoadStatus::Failed(message.into());
        true
    }

    /// Replace the data and return to idle, invalidating outstanding tickets.
    pub fn reset(&mut self, data: T) -> T {
        self.issued += 1;
        self.status = LoadStatus::Idle;
        std::mem::replace(&mut self.data, data)
    }
}
