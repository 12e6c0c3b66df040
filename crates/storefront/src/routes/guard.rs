//! Navigation guards.
//!
//! Private routes send anonymous visitors to the login page. Admin routes
//! send everyone without `ROLE_ADMIN` home.

use crate::state::SessionStore;

use super::{Access, Route};

/// Result of attempting to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The route may be shown.
    Allow(Route),
    /// Navigation is diverted.
    Redirect {
        /// Where the visitor tried to go.
        from: Route,
        /// Where they are sent instead.
        to: Route,
    },
}

impl RouteDecision {
    /// The route that ends up being shown.
    #[must_use]
    pub const fn destination(&self) -> &Route {
        match self {
            Self::Allow(route) | Self::Redirect { to: route, .. } => route,
        }
    }

    /// Whether navigation was diverted.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Decide whether `session` may open `route`.
#[must_use]
pub fn guard(route: Route, session: &SessionStore) -> RouteDecision {
    let redirect_to = match route.access() {
        Access::Public => None,
        Access::Private if !session.is_authenticated() => Some(Route::Login),
        Access::Admin if !session.is_admin() => Some(Route::Home),
        Access::Private | Access::Admin => None,
    };

    match redirect_to {
        Some(to) => {
            tracing::debug!(from = %route, to = %to, "Route guard redirect");
            RouteDecision::Redirect { from: route, to }
        }
        None => RouteDecision::Allow(route),
    }
}
