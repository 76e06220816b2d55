use crate::api::v1::AnalysisApi;
use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::hooks::keys;
use std::sync::Arc;

pub struct AnalysisHooks {
    cache: QueryCache,
    api: Arc<AnalysisApi>,
}

impl AnalysisHooks {
    pub fn new(cache: QueryCache, api: Arc<AnalysisApi>) -> Self {
        AnalysisHooks { cache, api }
    }

    pub async fn daily_recommendation(&self) -> Result<Arc<DailyRecommendation>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::all(keys::DAILY_RECOMMENDATION), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.daily_recommendation().await }
            })
            .await
    }

    pub async fn category(&self) -> Result<Arc<CategoryAnalysis>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::all(keys::CATEGORY_ANALYSIS), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.category().await }
            })
            .await
    }

    pub async fn weekly(&self) -> Result<Arc<WeeklySpending>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::all(keys::WEEKLY_SPENDING), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.weekly().await }
            })
            .await
    }

    pub async fn max_streak(&self) -> Result<Arc<MaxStreak>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::all(keys::MAX_STREAK), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.max_streak().await }
            })
            .await
    }

    /// Only a granted reward changes balances.
    pub async fn claim_weekly_point(&self) -> Result<WeeklyPointOutcome, ApiError> {
        self.cache
            .mutate_with(self.api.claim_weekly_point(), |outcome| match outcome {
                WeeklyPointOutcome::Granted => {
                    vec![keys::all(keys::MY_POINT), keys::all(keys::MY_INFO)]
                }
                WeeklyPointOutcome::StreakNotMet | WeeklyPointOutcome::AlreadyClaimed => vec![],
            })
            .await
    }
}
