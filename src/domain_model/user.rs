use crate::domain_model::SignupDraft;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Local,
    Kakao,
    Naver,
}

impl Provider {
    /// Parses the provider name `oauth-check` answers with. Empty means unregistered.
    pub fn from_registration(name: &str) -> Option<Provider> {
        match name.to_ascii_lowercase().as_str() {
            "local" => Some(Provider::Local),
            "kakao" => Some(Provider::Kakao),
            "naver" => Some(Provider::Naver),
            _ => None,
        }
    }
}

/// Result of a social sign-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialSignInOutcome {
    SignedIn,
    /// No account for this email yet; the signup wizard takes over.
    NeedsSignup,
    /// The email belongs to an account of another provider.
    RegisteredWith(Provider),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OauthCheckRequest {
    pub email: String,
    pub provider: Provider,
    pub provider_id: String,
}

/// Token grant returned by sign-in and reissue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    #[serde(default)]
    pub grant_type: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_token_expiration_time: i64,
    #[serde(default)]
    pub role: Vec<String>,
}

/// Account creation body, assembled from the signup draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub roles: Vec<String>,
    pub provider: Provider,
    pub provider_id: String,
    pub is_marketing: bool,
}

impl From<&SignupDraft> for SignUpRequest {
    fn from(draft: &SignupDraft) -> Self {
        let (provider, provider_id) = match &draft.social {
            Some((provider, id)) => (*provider, id.clone()),
            None => (Provider::Local, String::new()),
        };
        SignUpRequest {
            email: draft.email.clone(),
            password: draft.password.clone(),
            nickname: draft.nickname.clone(),
            age: draft.age,
            profile_image: draft.profile_image.clone(),
            roles: vec!["USER".to_owned()],
            provider,
            provider_id,
            is_marketing: draft.marketing_opt_in,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSendRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckRequest {
    pub email: String,
    pub auth_num: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingRequest {
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    pub profile_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRequest {
    pub survey_list: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyInfo {
    pub nickname: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub point: Option<i64>,
    pub is_marketing: bool,
    pub account_certification_status: bool,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
}

/// Locally cached profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub nickname: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub points: i64,
    pub is_marketing: bool,
    pub account_certification_status: bool,
}

/// One change to the local profile, applied by the profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEdit {
    /// Creates the profile if there is none.
    MergeMyInfo(MyInfo),
    SetMarketing(bool),
    SetProfileImage(String),
    AddPoints(i64),
    /// Never drops below zero.
    DeductPoints(i64),
}

impl ProfileEdit {
    pub fn creates_profile(&self) -> bool {
        matches!(self, ProfileEdit::MergeMyInfo(_))
    }
}

impl UserProfile {
    pub fn merge_my_info(&mut self, info: &MyInfo) {
        self.nickname = info.nickname.clone();
        self.profile_image = info.profile_image.clone();
        self.points = info.point.unwrap_or(self.points);
        self.is_marketing = info.is_marketing;
        self.account_certification_status = info.account_certification_status;
    }

    pub fn apply(&mut self, edit: ProfileEdit) {
        match edit {
            ProfileEdit::MergeMyInfo(info) => self.merge_my_info(&info),
            ProfileEdit::SetMarketing(is_marketing) => self.is_marketing = is_marketing,
            ProfileEdit::SetProfileImage(url) => self.profile_image = Some(url),
            ProfileEdit::AddPoints(points) => self.points = self.points.saturating_add(points),
            ProfileEdit::DeductPoints(points) => {
                self.points = self.points.saturating_sub(points).max(0)
            }
        }
    }
}

/// Own standing in the age ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRank {
    pub rank: u32,
    pub age: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub rank: u32,
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub my_item: MyRank,
    pub items: Vec<RankEntry>,
}
