//! Authentication and member endpoints.

use fruit_mall_core::MemberId;
use tracing::instrument;

use super::{
    ApiClient, ApiError, ChangePasswordRequest, CurrentUser, LoginRequest, RegisterRequest,
    TokenResponse, UpdateMemberRequest,
};

impl ApiClient {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, request), fields(user = %request.username_or_email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post(&["auth", "login"], request).await
    }

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the request fails.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<CurrentUser, ApiError> {
        self.post(&["auth", "register"], request).await
    }

    /// Fetch the member the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is missing or expired.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get(&["members", "me"]).await
    }

    /// Update a member's name, phone number and address.
    ///
    /// # Errors
    ///
    /// Returns a `403` error when editing another member without the admin
    /// role, or an error if the request fails.
    #[instrument(skip(self, request), fields(member_id = %id))]
    pub async fn update_member(
        &self,
        id: MemberId,
        request: &UpdateMemberRequest,
    ) -> Result<CurrentUser, ApiError> {
        self.put(&["members", &id.to_string()], request).await
    }

    /// Change a member's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request fails.
    #[instrument(skip(self, request), fields(member_id = %id))]
    pub async fn change_password(
        &self,
        id: MemberId,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        self.put_no_content(&["members", &id.to_string(), "password"], request)
            .await
    }
}
