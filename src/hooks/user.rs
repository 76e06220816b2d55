use crate::api::v1::UserApi;
use crate::application_impl::*;
use crate::application_port::{ApiError, UserProfileStore};
use crate::domain_model::*;
use crate::hooks::keys;
use crate::logger::*;
use std::sync::Arc;

/// Account reads and writes that also touch the local profile.
///
/// Profile updates that follow a request are dropped when the profile was
/// cleared while the request was in flight.
pub struct UserHooks {
    cache: QueryCache,
    api: Arc<UserApi>,
    profile: Arc<dyn UserProfileStore>,
}

impl UserHooks {
    pub fn new(cache: QueryCache, api: Arc<UserApi>, profile: Arc<dyn UserProfileStore>) -> Self {
        UserHooks {
            cache,
            api,
            profile,
        }
    }

    /// Fetches the account info and folds it into the local profile.
    pub async fn my_info(&self) -> Result<Arc<MyInfo>, ApiError> {
        let generation = self.profile.generation();
        let api = self.api.clone();
        let options = QueryOptions {
            retry: 0,
            ..self.cache.defaults()
        };
        let info = self
            .cache
            .query(keys::all(keys::MY_INFO), options, move || {
                let api = api.clone();
                async move { api.my_info().await }
            })
            .await?;
        if !self
            .profile
            .edit(generation, ProfileEdit::MergeMyInfo(MyInfo::clone(&info)))
        {
            debug!("my info arrived after the profile was cleared");
        }
        Ok(info)
    }

    pub async fn submit_survey(&self, answers: Vec<bool>) -> Result<(), ApiError> {
        let body = SurveyRequest {
            survey_list: answers,
        };
        self.cache
            .mutate(&[keys::all(keys::MY_INFO)], self.api.submit_survey(&body))
            .await
    }

    pub async fn update_marketing(&self, is_marketing: bool) -> Result<(), ApiError> {
        let generation = self.profile.generation();
        let body = MarketingRequest {
            status: is_marketing,
        };
        self.cache
            .mutate(&[keys::all(keys::MY_INFO)], self.api.update_marketing(&body))
            .await?;
        self.profile
            .edit(generation, ProfileEdit::SetMarketing(is_marketing));
        Ok(())
    }

    pub async fn update_profile_image(&self, url: &str) -> Result<(), ApiError> {
        let generation = self.profile.generation();
        let body = ProfileImageRequest {
            profile_image_url: url.to_owned(),
        };
        self.cache
            .mutate(&[keys::all(keys::MY_INFO)], self.api.update_profile_image(&body))
            .await?;
        self.profile
            .edit(generation, ProfileEdit::SetProfileImage(url.to_owned()));
        Ok(())
    }

    /// Whether `email` is still free. A taken address comes back as the
    /// server's error, with its message.
    pub async fn check_email(&self, email: &str) -> Result<(), ApiError> {
        let api = self.api.clone();
        let owned = email.to_owned();
        self.cache
            .query(keys::email_check(email), self.cache.defaults(), move || {
                let api = api.clone();
                let email = owned.clone();
                async move { api.check_email_available(&email).await }
            })
            .await
            .map(|_| ())
    }

    pub async fn check_nickname(&self, nickname: &str) -> Result<(), ApiError> {
        let api = self.api.clone();
        let owned = nickname.to_owned();
        let options = QueryOptions {
            retry: 0,
            ..self.cache.defaults()
        };
        self.cache
            .query(keys::nickname_check(nickname), options, move || {
                let api = api.clone();
                let nickname = owned.clone();
                async move { api.check_nickname_available(&nickname).await }
            })
            .await
            .map(|_| ())
    }

    pub async fn send_verification_mail(&self, email: &str) -> Result<(), ApiError> {
        let body = MailSendRequest {
            email: email.to_owned(),
        };
        self.api.mail_send(&body).await
    }

    /// Checks the emailed code; returns the verification id.
    pub async fn verify_mail_code(&self, email: &str, code: &str) -> Result<String, ApiError> {
        let body = AuthCheckRequest {
            email: email.to_owned(),
            auth_num: code.to_owned(),
        };
        self.api.auth_check(&body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::HttpMethod;
    use crate::infra::{FakeTransport, ManualClock};
    use std::time::Duration;

    const MY_INFO_PATH: &str = "/api/v1/user/my-info";

    const MY_INFO_BODY: &str = r#"{"isSuccess":true,"code":"COMMON200","message":"OK","result":{
        "nickname":"penny","point":120,"isMarketing":true,"accountCertificationStatus":false}}"#;

    fn setup_with(
        transport: FakeTransport,
    ) -> (Arc<FakeTransport>, QueryCache, Arc<InMemoryUserProfileStore>, UserHooks) {
        let transport = Arc::new(transport);
        let session = Arc::new(InMemorySessionStore::new(vec![]));
        let gateway = Arc::new(RequestGateway::new(session, transport.clone()));
        let cache = QueryCache::new(Arc::new(ManualClock::new()), QueryOptions::default());
        let profile = Arc::new(InMemoryUserProfileStore::default());
        let hooks = UserHooks::new(cache.clone(), Arc::new(UserApi::new(gateway)), profile.clone());
        (transport, cache, profile, hooks)
    }

    fn setup() -> (Arc<FakeTransport>, QueryCache, Arc<InMemoryUserProfileStore>, UserHooks) {
        setup_with(FakeTransport::new())
    }

    #[tokio::test]
    async fn my_info_seeds_the_profile() {
        let (transport, _cache, profile, hooks) = setup();
        transport.respond(MY_INFO_PATH, 200, MY_INFO_BODY);

        let info = hooks.my_info().await.unwrap();

        assert_eq!(info.nickname, "penny");
        let stored = profile.profile().unwrap();
        assert_eq!(stored.points, 120);
        assert!(stored.is_marketing);
    }

    #[tokio::test]
    async fn my_info_landing_after_a_clear_leaves_no_profile() {
        let (transport, _cache, profile, hooks) =
            setup_with(FakeTransport::new().with_latency(Duration::from_millis(50)));
        transport.respond(MY_INFO_PATH, 200, MY_INFO_BODY);
        profile.set_profile(UserProfile::default());

        let (info, ()) = tokio::join!(hooks.my_info(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            profile.clear();
        });

        assert_eq!(info.unwrap().nickname, "penny");
        assert_eq!(profile.profile(), None);
    }

    #[tokio::test]
    async fn survey_invalidates_my_info() {
        let (transport, cache, _profile, hooks) = setup();
        transport.respond(MY_INFO_PATH, 200, MY_INFO_BODY);
        transport.respond("/api/v1/user/survey", 200, "");

        hooks.my_info().await.unwrap();
        hooks.submit_survey(vec![true, false, true]).await.unwrap();
        assert_eq!(cache.state(&keys::all(keys::MY_INFO)), QueryState::Empty);

        hooks.my_info().await.unwrap();
        assert_eq!(transport.count(HttpMethod::Get, MY_INFO_PATH), 2);
    }

    #[tokio::test]
    async fn marketing_update_invalidates_my_info_and_sets_the_flag() {
        let (transport, cache, profile, hooks) = setup();
        transport.respond(MY_INFO_PATH, 200, MY_INFO_BODY);
        transport.respond("/api/v1/user/marketing", 200, "");

        hooks.my_info().await.unwrap();
        hooks.update_marketing(false).await.unwrap();

        assert_eq!(cache.state(&keys::all(keys::MY_INFO)), QueryState::Empty);
        assert!(!profile.profile().unwrap().is_marketing);
        let sent = transport.requests();
        let patch = sent.last().unwrap();
        assert_eq!(patch.method, HttpMethod::Patch);
        assert_eq!(patch.body, Some(serde_json::json!({ "status": false })));
    }

    #[tokio::test]
    async fn taken_nickname_reports_the_server_message_without_retry() {
        let (transport, _cache, _profile, hooks) = setup();
        transport.respond(
            "/api/v1/user/nickname-duplicate-check",
            409,
            r#"{"isSuccess":false,"code":"USER4091","message":"이미 사용 중인 닉네임입니다."}"#,
        );

        let err = hooks.check_nickname("penny").await.unwrap_err();

        assert_eq!(err.code(), Some("USER4091"));
        assert!(err.to_string().contains("이미 사용 중인 닉네임입니다."));
        assert_eq!(
            transport.count(HttpMethod::Post, "/api/v1/user/nickname-duplicate-check"),
            1
        );
        let sent = &transport.requests()[0];
        assert_eq!(sent.query, vec![("nickname".to_owned(), "penny".to_owned())]);
    }
}
