use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

pub struct UserApi {
    gateway: Arc<RequestGateway>,
}

impl UserApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        UserApi { gateway }
    }

    pub async fn sign_in(&self, body: &SignInRequest) -> Result<TokenGrant, ApiError> {
        let request = ApiRequest::post("/api/v1/user/sign-in").json(body)?;
        self.gateway.call(request).await
    }

    pub async fn sign_up(&self, body: &SignUpRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/api/v1/user/sign-up").json(body)?;
        self.gateway.call_unit(request).await
    }

    /// Succeeds when no account uses `email`; a taken address is an error.
    pub async fn check_email_available(&self, email: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post("/api/v1/user/email-duplicate-check").query("email", email);
        self.gateway.call_unit(request).await
    }

    pub async fn check_nickname_available(&self, nickname: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::post("/api/v1/user/nickname-duplicate-check").query("nickname", nickname);
        self.gateway.call_unit(request).await
    }

    /// Sends the signup verification code.
    pub async fn mail_send(&self, body: &MailSendRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/api/v1/mail/send").json(body)?;
        self.gateway.call_unit(request).await
    }

    /// Checks the emailed code and returns the verification id.
    pub async fn auth_check(&self, body: &AuthCheckRequest) -> Result<String, ApiError> {
        let request = ApiRequest::post("/api/v1/mail/auth-check").json(body)?;
        self.gateway.call(request).await
    }

    /// Provider the email is registered with, or `None` if it is unregistered.
    pub async fn oauth_check(&self, body: &OauthCheckRequest) -> Result<Option<Provider>, ApiError> {
        let request = ApiRequest::post("/api/v1/user/oauth-check").json(body)?;
        let registered: String = self.gateway.call(request).await?;
        Ok(Provider::from_registration(&registered))
    }

    pub async fn reissue(&self, body: &ReissueRequest) -> Result<TokenGrant, ApiError> {
        let request = ApiRequest::post("/api/v1/user/token/reissue").json(body)?;
        self.gateway.call(request).await
    }

    pub async fn submit_survey(&self, body: &SurveyRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/api/v1/user/survey").json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn my_info(&self) -> Result<MyInfo, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/user/my-info"))
            .await
    }

    pub async fn update_marketing(&self, body: &MarketingRequest) -> Result<(), ApiError> {
        let request = ApiRequest::patch("/api/v1/user/marketing").json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn update_profile_image(&self, body: &ProfileImageRequest) -> Result<(), ApiError> {
        let request = ApiRequest::put("/api/v1/user/profileImage").json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn withdraw(&self) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::delete("/api/v1/user/delete"))
            .await
    }
}
