use crate::domain_model::*;
use tokio::sync::watch;

/// Single authority for authentication state.
///
/// Operations are pure state transitions and cannot fail. `login` takes the
/// token pair, so a logged-in session always carries both tokens.
pub trait SessionStore: Send + Sync {
    fn snapshot(&self) -> Session;
    fn access_token(&self) -> Option<AccessToken>;
    fn is_logged_in(&self) -> bool;

    fn set_access_token(&self, token: AccessToken);
    fn set_refresh_token(&self, token: RefreshToken);
    fn login(&self, tokens: AuthTokens);
    /// Swaps in `tokens` only while the session is logged in with exactly
    /// `expected`. Returns whether the swap happened.
    fn replace_tokens_if(&self, expected: &AuthTokens, tokens: AuthTokens) -> bool;
    /// Clears tokens, login flag and signup draft, then notifies dependent stores.
    /// Idempotent.
    fn logout(&self);

    fn update_signup_draft(&self, field: SignupField);
    fn clear_signup_draft(&self);

    fn subscribe(&self) -> watch::Receiver<Session>;
}

/// A store whose contents belong to the signed-in user.
pub trait LogoutListener: Send + Sync {
    fn on_logout(&self);
}
