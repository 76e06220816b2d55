use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

pub struct RouletteApi {
    gateway: Arc<RequestGateway>,
}

impl RouletteApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        RouletteApi { gateway }
    }

    pub async fn spin(&self, body: &RouletteSpinRequest) -> Result<RouletteResult, ApiError> {
        let request = ApiRequest::post("/api/v1/roulette/spin").json(body)?;
        self.gateway.call(request).await
    }

    pub async fn my_tickets(&self) -> Result<MyTickets, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/roulette/my-tickets"))
            .await
    }
}
