use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

pub struct AnalysisApi {
    gateway: Arc<RequestGateway>,
}

impl AnalysisApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        AnalysisApi { gateway }
    }

    pub async fn daily_recommendation(&self) -> Result<DailyRecommendation, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/analysis/daily"))
            .await
    }

    pub async fn category(&self) -> Result<CategoryAnalysis, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/analysis/category"))
            .await
    }

    pub async fn weekly(&self) -> Result<WeeklySpending, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/analysis/weekly"))
            .await
    }

    pub async fn max_streak(&self) -> Result<MaxStreak, ApiError> {
        self.gateway
            .call(ApiRequest::get("/api/v1/analysis/max-streak"))
            .await
    }

    /// Claims the 7-day streak reward.
    ///
    /// 400 and 409 are expected answers here and come back as outcomes.
    pub async fn claim_weekly_point(&self) -> Result<WeeklyPointOutcome, ApiError> {
        let result = self
            .gateway
            .call_unit(ApiRequest::post("/api/v1/analysis/weekly-point"))
            .await;
        match result {
            Ok(()) => Ok(WeeklyPointOutcome::Granted),
            Err(e) => match e.status() {
                Some(400) => Ok(WeeklyPointOutcome::StreakNotMet),
                Some(409) => Ok(WeeklyPointOutcome::AlreadyClaimed),
                _ => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::FakeTransport;

    fn api(transport: Arc<FakeTransport>) -> AnalysisApi {
        let session = Arc::new(InMemorySessionStore::new(vec![]));
        AnalysisApi::new(Arc::new(RequestGateway::new(session, transport)))
    }

    #[tokio::test]
    async fn weekly_point_business_conditions_are_outcomes() {
        let transport = Arc::new(FakeTransport::new());
        let api = api(transport.clone());
        let path = "/api/v1/analysis/weekly-point";

        transport.enqueue(path, 200, r#"{"isSuccess":true,"code":"COMMON200","message":"OK","result":null}"#);
        transport.enqueue(path, 400, r#"{"isSuccess":false,"code":"ANALYSIS400","message":"streak"}"#);
        transport.enqueue(path, 409, r#"{"isSuccess":false,"code":"ANALYSIS409","message":"claimed"}"#);
        transport.enqueue(path, 500, "");

        assert_eq!(api.claim_weekly_point().await, Ok(WeeklyPointOutcome::Granted));
        assert_eq!(api.claim_weekly_point().await, Ok(WeeklyPointOutcome::StreakNotMet));
        assert_eq!(api.claim_weekly_point().await, Ok(WeeklyPointOutcome::AlreadyClaimed));
        assert!(matches!(
            api.claim_weekly_point().await,
            Err(ApiError::Server { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn category_decodes_breakdown() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/api/v1/analysis/category",
            200,
            r#"{"isSuccess":true,"code":"COMMON200","message":"OK","result":{
                "averageSpendingFor20s":300000,"myTotalSpending":250000,
                "comparisonPercentage":-16.7,
                "categorySpendings":[{"categoryName":"food","amount":120000,"percentage":48.0}]
            }}"#,
        );

        let analysis = api(transport).category().await.unwrap();
        assert_eq!(analysis.my_total_spending, 250000);
        assert_eq!(analysis.category_spendings[0].category_name, "food");
    }
}
