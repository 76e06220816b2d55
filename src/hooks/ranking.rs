use crate::api::v1::RankingApi;
use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::hooks::keys;
use std::sync::Arc;

pub struct RankingHooks {
    cache: QueryCache,
    api: Arc<RankingApi>,
}

impl RankingHooks {
    pub fn new(cache: QueryCache, api: Arc<RankingApi>) -> Self {
        RankingHooks { cache, api }
    }

    pub async fn ranking(&self) -> Result<Arc<Ranking>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::all(keys::RANKING), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.ranking().await }
            })
            .await
    }
}
