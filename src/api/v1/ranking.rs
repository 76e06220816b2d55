use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

pub struct RankingApi {
    gateway: Arc<RequestGateway>,
}

impl RankingApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        RankingApi { gateway }
    }

    /// Age ranking, with the caller's own standing.
    pub async fn ranking(&self) -> Result<Ranking, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/home/rank"))
            .await
    }
}
