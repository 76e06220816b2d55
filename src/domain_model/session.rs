use crate::domain_model::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", redact(&self.0))
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefreshToken({})", redact(&self.0))
    }
}

fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{}…", prefix)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken(access_token.into()),
            refresh_token: RefreshToken(refresh_token.into()),
        }
    }
}

/// Multi-step signup wizard state. Only the session store mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDraft {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub age: Option<u8>,
    pub profile_image: Option<String>,
    pub marketing_opt_in: bool,
    /// Set when the wizard was entered from a social sign-in.
    pub social: Option<(Provider, String)>,
}

/// One field of a [`SignupDraft`]; applying it leaves the other fields untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupField {
    Email(String),
    Password(String),
    Nickname(String),
    Age(u8),
    ProfileImage(Option<String>),
    MarketingOptIn(bool),
    Social {
        provider: Provider,
        provider_id: String,
    },
}

impl SignupDraft {
    pub fn apply(&mut self, field: SignupField) {
        match field {
            SignupField::Email(email) => self.email = email,
            SignupField::Password(password) => self.password = password,
            SignupField::Nickname(nickname) => self.nickname = nickname,
            SignupField::Age(age) => self.age = Some(age),
            SignupField::ProfileImage(image) => self.profile_image = image,
            SignupField::MarketingOptIn(opt_in) => self.marketing_opt_in = opt_in,
            SignupField::Social {
                provider,
                provider_id,
            } => self.social = Some((provider, provider_id)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub logged_in: bool,
    pub signup_draft: SignupDraft,
}

impl Session {
    /// Both tokens, if the session holds a complete pair.
    pub fn tokens(&self) -> Option<AuthTokens> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(AuthTokens {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_cleared(&self) -> bool {
        *self == Session::default()
    }

    /// What `auth-storage` holds; `None` once both tokens are gone.
    pub fn persisted(&self) -> Option<PersistedSession> {
        let persisted = PersistedSession::from(self);
        (persisted != PersistedSession::default()).then_some(persisted)
    }
}

/// The whitelisted projection written to the `auth-storage` partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        PersistedSession {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }
}

impl PersistedSession {
    pub fn into_tokens(self) -> Option<AuthTokens> {
        Some(AuthTokens {
            access_token: self.access_token?,
            refresh_token: self.refresh_token?,
        })
    }
}
