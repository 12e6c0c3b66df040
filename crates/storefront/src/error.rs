//! Unified error handling with Sentry integration.
//!
//! Every `AppContext` operation returns `Result<T, AppError>`. Front ends show
//! [`AppError::user_message`] next to the action that failed; unexpected
//! failures are reported to Sentry via [`AppError::report`].

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Shown when nothing more specific can be said.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Persisted storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a signed-in member.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Resource not found locally.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Message suitable for showing inline next to the failed action.
    ///
    /// Backend messages are passed through; field errors are listed; anything
    /// unexpected collapses to [`GENERIC_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Api {
                status,
                message,
                field_errors,
                ..
            }) if *status < 500 => {
                if field_errors.is_empty() {
                    message.clone()
                } else {
                    let fields: Vec<String> = field_errors
                        .iter()
                        .map(|(field, msg)| format!("{field}: {msg}"))
                        .collect();
                    format!("{message} ({})", fields.join(", "))
                }
            }
            Self::Api(ApiError::Unauthorized) | Self::NotAuthenticated => {
                "Please sign in to continue.".to_string()
            }
            Self::Api(ApiError::NotFound {
                message: Some(message),
                ..
            }) => message.clone(),
            Self::Api(ApiError::NotFound { message: None, .. }) | Self::NotFound(_) => {
                "The requested item could not be found.".to_string()
            }
            Self::Api(ApiError::Http(e)) if e.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Self::Api(ApiError::Http(e)) if e.is_connect() => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            Self::Validation(msg) => msg.clone(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::Config(e) => e.to_string(),
            Self::Api(_) | Self::Storage(_) => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Whether this error means the session has ended.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }

    /// Whether this error is unexpected and worth reporting.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Api(ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_))
        ) || matches!(self, Self::Api(ApiError::Api { status, .. }) if *status >= 500)
    }

    /// Capture unexpected errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Storefront operation rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after the current member is known to associate errors with them.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the member.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Viewed product", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 7".to_string());
        assert_eq!(err.to_string(), "Not found: order 7");

        let err = AppError::Validation("rating must be between 1 and 5".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: rating must be between 1 and 5"
        );
    }

    #[test]
    fn test_backend_message_is_shown() {
        let err = AppError::Api(ApiError::Api {
            status: 400,
            code: Some("ORDER-002".to_string()),
            message: "Order already shipped".to_string(),
            field_errors: BTreeMap::new(),
        });
        assert_eq!(err.user_message(), "Order already shipped");
        assert!(!err.is_unexpected());
    }

    #[test]
    fn test_not_found_shows_backend_message_when_present() {
        let err = AppError::Api(ApiError::NotFound {
            path: "/api/auth/login".to_string(),
            message: Some("회원을 찾을 수 없습니다".to_string()),
        });
        assert_eq!(err.user_message(), "회원을 찾을 수 없습니다");
        assert!(!err.is_unexpected());

        let err = AppError::Api(ApiError::NotFound {
            path: "/api/fruits/9".to_string(),
            message: None,
        });
        assert_eq!(err.user_message(), "The requested item could not be found.");
    }

    #[test]
    fn test_field_errors_are_listed() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("email".to_string(), "already registered".to_string());
        field_errors.insert("username".to_string(), "too short".to_string());
        let err = AppError::Api(ApiError::Api {
            status: 400,
            code: None,
            message: "Invalid input".to_string(),
            field_errors,
        });
        assert_eq!(
            err.user_message(),
            "Invalid input (email: already registered, username: too short)"
        );
    }

    #[test]
    fn test_unexpected_errors_get_generic_message() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = AppError::Api(ApiError::Parse(parse));
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert!(err.is_unexpected());

        let err = AppError::Api(ApiError::Api {
            status: 503,
            code: None,
            message: "Service Unavailable".to_string(),
            field_errors: BTreeMap::new(),
        });
        assert!(err.is_unexpected());
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_unauthorized() {
        let err = AppError::Api(ApiError::Unauthorized);
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Please sign in to continue.");
        assert!(!AppError::NotAuthenticated.is_unauthorized());
    }
}
