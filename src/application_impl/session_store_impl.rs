use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use std::sync::Arc;
use tokio::sync::watch;

pub struct InMemorySessionStore {
    state: watch::Sender<Session>,
    logout_listeners: Vec<Arc<dyn LogoutListener>>,
}

impl InMemorySessionStore {
    pub fn new(logout_listeners: Vec<Arc<dyn LogoutListener>>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            state,
            logout_listeners,
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    fn access_token(&self) -> Option<AccessToken> {
        self.state.borrow().access_token.clone()
    }

    fn is_logged_in(&self) -> bool {
        self.state.borrow().logged_in
    }

    fn set_access_token(&self, token: AccessToken) {
        debug!(?token, "access token replaced");
        self.state.send_modify(|s| s.access_token = Some(token));
    }

    fn set_refresh_token(&self, token: RefreshToken) {
        debug!(?token, "refresh token replaced");
        self.state.send_modify(|s| s.refresh_token = Some(token));
    }

    fn login(&self, tokens: AuthTokens) {
        self.state.send_modify(|s| {
            s.access_token = Some(tokens.access_token);
            s.refresh_token = Some(tokens.refresh_token);
            s.logged_in = true;
        });
        info!("session logged in");
    }

    fn replace_tokens_if(&self, expected: &AuthTokens, tokens: AuthTokens) -> bool {
        let replaced = self.state.send_if_modified(|s| {
            if !s.logged_in || s.tokens().as_ref() != Some(expected) {
                return false;
            }
            s.access_token = Some(tokens.access_token);
            s.refresh_token = Some(tokens.refresh_token);
            true
        });
        if !replaced {
            debug!("token pair changed underneath, replacement skipped");
        }
        replaced
    }

    fn logout(&self) {
        let changed = self.state.send_if_modified(|s| {
            if s.is_cleared() {
                return false;
            }
            *s = Session::default();
            true
        });
        for listener in &self.logout_listeners {
            listener.on_logout();
        }
        if changed {
            info!("session logged out");
        }
    }

    fn update_signup_draft(&self, field: SignupField) {
        self.state.send_modify(|s| s.signup_draft.apply(field));
    }

    fn clear_signup_draft(&self) {
        self.state.send_if_modified(|s| {
            if s.signup_draft == SignupDraft::default() {
                return false;
            }
            s.signup_draft = SignupDraft::default();
            true
        });
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingListener(AtomicUsize);

    impl LogoutListener for CountingListener {
        fn on_logout(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn login_carries_both_tokens() {
        let store = InMemorySessionStore::new(vec![]);
        store.login(AuthTokens::new("a", "r"));

        let session = store.snapshot();
        assert!(session.logged_in);
        assert_eq!(session.tokens(), Some(AuthTokens::new("a", "r")));
    }

    #[test]
    fn setters_replace_without_touching_the_flag() {
        let store = InMemorySessionStore::new(vec![]);
        store.set_access_token(AccessToken("a1".into()));
        store.set_refresh_token(RefreshToken("r1".into()));

        assert!(!store.is_logged_in());
        assert_eq!(store.access_token(), Some(AccessToken("a1".into())));
    }

    #[test]
    fn token_replacement_needs_the_expected_pair() {
        let store = InMemorySessionStore::new(vec![]);
        let old = AuthTokens::new("a", "r");
        assert!(!store.replace_tokens_if(&old, AuthTokens::new("a2", "r2")));

        store.login(old.clone());
        assert!(store.replace_tokens_if(&old, AuthTokens::new("a2", "r2")));
        assert!(!store.replace_tokens_if(&old, AuthTokens::new("a3", "r3")));
        assert_eq!(store.snapshot().tokens(), Some(AuthTokens::new("a2", "r2")));

        store.logout();
        let current = AuthTokens::new("a2", "r2");
        assert!(!store.replace_tokens_if(&current, AuthTokens::new("a4", "r4")));
        assert!(store.snapshot().is_cleared());
    }

    #[test]
    fn logout_twice_matches_logout_once() {
        let listener = Arc::new(CountingListener::default());
        let store = InMemorySessionStore::new(vec![listener.clone()]);
        store.login(AuthTokens::new("a", "r"));
        store.update_signup_draft(SignupField::Nickname("nick".into()));

        store.logout();
        let once = store.snapshot();
        store.logout();
        let twice = store.snapshot();

        assert_eq!(once, twice);
        assert!(twice.is_cleared());
        assert_eq!(twice.access_token, None);
        assert!(!twice.logged_in);
        assert_eq!(twice.signup_draft, SignupDraft::default());
        assert_eq!(listener.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn redundant_logout_does_not_notify_subscribers() {
        let store = InMemorySessionStore::new(vec![]);
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.logout();
        assert!(!rx.has_changed().unwrap());

        store.login(AuthTokens::new("a", "r"));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn signup_draft_setters_merge() {
        let store = InMemorySessionStore::new(vec![]);
        store.update_signup_draft(SignupField::Email("e@x.io".into()));
        store.update_signup_draft(SignupField::Password("pw".into()));

        let draft = store.snapshot().signup_draft;
        assert_eq!(draft.email, "e@x.io");
        assert_eq!(draft.password, "pw");

        store.clear_signup_draft();
        assert_eq!(store.snapshot().signup_draft, SignupDraft::default());
    }
}
