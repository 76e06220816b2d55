use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

pub struct ShopApi {
    gateway: Arc<RequestGateway>,
}

impl ShopApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        ShopApi { gateway }
    }

    pub async fn my_point(&self) -> Result<MyPoint, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/shop/my-point"))
            .await
    }

    /// Product page. The backend does not pin this shape down.
    pub async fn product_detail(&self, product_id: i64) -> Result<Untyped, ApiError> {
        self.gateway
            .call(ApiRequest::get(format!("/api/v1/shop/{}", product_id)))
            .await
    }

    /// Cashes points out to a bank account. Every non-2xx is a failure here.
    pub async fn account_transfer(
        &self,
        body: &AccountTransferRequest,
    ) -> Result<AccountTransferResult, ApiError> {
        let request = ApiRequest::post("/api/v1/shop/account-transfer").json(body)?;
        self.gateway.call(request).await
    }
}
