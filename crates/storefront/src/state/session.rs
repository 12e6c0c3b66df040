//! Auth session store.

use secrecy::SecretString;

use crate::api::CurrentUser;

use super::{Loadable, RequestTicket};

/// The signed-in member, if any.
///
/// Holding a token is what makes the client authenticated; the profile is
/// fetched afterwards and may still be loading or have failed.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: Option<SecretString>,
    user: Loadable<Option<CurrentUser>>,
}

impl SessionStore {
    /// A session restored from a persisted token.
    #[must_use]
    pub fn with_token(token: Option<SecretString>) -> Self {
        Self {
            token,
            user: Loadable::default(),
        }
    }

    /// Whether a session token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The session token.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The member profile, once fetched.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.data().as_ref()
    }

    /// Whether the signed-in member is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user().is_some_and(CurrentUser::is_admin)
    }

    /// Request state of the profile.
    #[must_use]
    pub const fn profile(&self) -> &Loadable<Option<CurrentUser>> {
        &self.user
    }

    /// Install a freshly issued token. Any previous profile is dropped.
    pub fn signed_in(&mut self, token: SecretString) {
        self.token = Some(token);
        self.user.reset(None);
    }

    /// Start fetching the profile.
    pub fn begin_profile(&mut self) -> RequestTicket {
        self.user.begin()
    }

    /// Store the fetched profile.
    pub fn profile_loaded(&mut self, ticket: RequestTicket, user: CurrentUser) -> bool {
        self.user.fulfil(ticket, Some(user))
    }

    /// Record a failed profile fetch.
    pub fn profile_failed(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        self.user.reject(ticket, message)
    }

    /// Forget the token and profile.
    pub fn clear(&mut self) {
        self.token = None;
        self.user.reset(None);
    }
}

#[cfg(test)]
mod tests {
    use fruit_mall_core::{MemberId, Role};

    use super::*;

    fn member(roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: MemberId::new(1),
            username: "kim".to_string(),
            email: "kim@fruitmall.com".to_string(),
            name: "Kim".to_string(),
            phone_number: None,
            address: None,
            roles,
        }
    }

    #[test]
    fn test_token_alone_authenticates() {
        let session = SessionStore::with_token(Some(SecretString::from("t")));
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_admin_requires_role() {
        let mut session = SessionStore::default();
        session.signed_in(SecretString::from("t"));

        let ticket = session.begin_profile();
        assert!(session.profile_loaded(ticket, member(vec![Role::User, Role::Admin])));
        assert!(session.is_admin());

        let ticket = session.begin_profile();
        session.profile_loaded(ticket, member(vec![Role::User]));
        assert!(!session.is_admin());
    }

    #[test]
    fn test_clear_discards_pending_profile() {
        let mut session = SessionStore::with_token(Some(SecretString::from("t")));
        let ticket = session.begin_profile();
        session.clear();

        assert!(!session.profile_loaded(ticket, member(vec![Role::Admin])));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }
}
