use crate::api::v1::{RouletteApi, ShopApi};
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::hooks::{keys, long_lived, short_lived};
use std::sync::Arc;

/// Roulette tickets, point balance and cash-out.
pub struct RewardHooks {
    cache: QueryCache,
    roulette: Arc<RouletteApi>,
    shop: Arc<ShopApi>,
    profile: Arc<dyn UserProfileStore>,
}

impl RewardHooks {
    pub fn new(
        cache: QueryCache,
        roulette: Arc<RouletteApi>,
        shop: Arc<ShopApi>,
        profile: Arc<dyn UserProfileStore>,
    ) -> Self {
        RewardHooks {
            cache,
            roulette,
            shop,
            profile,
        }
    }

    pub async fn my_tickets(&self) -> Result<Arc<MyTickets>, ApiError> {
        let api = self.roulette.clone();
        self.cache
            .query(keys::all(keys::MY_TICKETS), short_lived(self.cache.defaults()), move || {
                let api = api.clone();
                async move { api.my_tickets().await }
            })
            .await
    }

    pub async fn my_point(&self) -> Result<Arc<MyPoint>, ApiError> {
        let api = self.shop.clone();
        self.cache
            .query(keys::all(keys::MY_POINT), short_lived(self.cache.defaults()), move || {
                let api = api.clone();
                async move { api.my_point().await }
            })
            .await
    }

    pub async fn product_detail(&self, product_id: i64) -> Result<Arc<Untyped>, ApiError> {
        let api = self.shop.clone();
        self.cache
            .query(keys::product_detail(product_id), long_lived(self.cache.defaults()), move || {
                let api = api.clone();
                async move { api.product_detail(product_id).await }
            })
            .await
    }

    pub async fn spin(&self, request: RouletteSpinRequest) -> Result<RouletteResult, ApiError> {
        let generation = self.profile.generation();
        let result = self
            .cache
            .mutate(
                &[keys::all(keys::MY_TICKETS), keys::all(keys::MY_POINT)],
                self.roulette.spin(&request),
            )
            .await?;
        self.profile
            .edit(generation, ProfileEdit::AddPoints(result.points));
        Ok(result)
    }

    pub async fn account_transfer(
        &self,
        account: &str,
        points: i64,
    ) -> Result<AccountTransferResult, ApiError> {
        let generation = self.profile.generation();
        let request = AccountTransferRequest {
            account: account.to_owned(),
            price: points.to_string(),
        };
        let result = self
            .cache
            .mutate(
                &[keys::all(keys::MY_POINT), keys::all(keys::MY_INFO)],
                self.shop.account_transfer(&request),
            )
            .await?;
        self.profile
            .edit(generation, ProfileEdit::DeductPoints(points));
        Ok(result)
    }
}
