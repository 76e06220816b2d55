use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use std::sync::Arc;

const GROUPS: &str = "/api/v1/routines/groups";
const MY_ROUTINES: &str = "/api/v1/my-routine/list";

/// Templates and emojis offered when composing a routine.
pub struct RoutineCatalogApi {
    gateway: Arc<RequestGateway>,
}

impl RoutineCatalogApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        RoutineCatalogApi { gateway }
    }

    pub async fn templates(
        &self,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<RoutineTemplate>, ApiError> {
        let request = ApiRequest::get("/api/v1/routines/templates")
            .query_opt("category", category)
            .query("page", page.page)
            .query("size", page.size);
        self.gateway.call(request).await
    }

    pub async fn emojis(&self, category: Option<&str>, page: PageRequest) -> Result<EmojiList, ApiError> {
        let request = ApiRequest::get("/api/v1/routines/emoji")
            .query_opt("category", category)
            .query("page", page.page)
            .query("size", page.size);
        self.gateway.call(request).await
    }
}

pub struct GroupRoutineApi {
    gateway: Arc<RequestGateway>,
}

impl GroupRoutineApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        GroupRoutineApi { gateway }
    }

    pub async fn list(
        &self,
        page: PageRequest,
        joined: Option<bool>,
    ) -> Result<Page<GroupRoutineItem>, ApiError> {
        let request = ApiRequest::get(GROUPS)
            .query("page", page.page)
            .query("size", page.size)
            .query_opt("joined", joined);
        self.gateway.call(request).await
    }

    /// Groups the user joined, as shown on the home screen.
    pub async fn mine(&self, page: PageRequest) -> Result<Page<GroupRoutineItem>, ApiError> {
        let request = ApiRequest::get("/api/v1/home/groups")
            .query("page", page.page)
            .query("pageSize", page.size);
        self.gateway.call(request).await
    }

    pub async fn search(&self, keyword: &str) -> Result<Page<GroupRoutineItem>, ApiError> {
        let request = ApiRequest::get(format!("{}/search", GROUPS)).query("keyword", keyword);
        self.gateway.call(request).await
    }

    pub async fn detail(&self, id: GroupRoutineId) -> Result<GroupRoutineDetail, ApiError> {
        self.gateway
            .call(ApiRequest::get(format!("{}/{}", GROUPS, id)))
            .await
    }

    pub async fn create(&self, body: &GroupRoutineRequest) -> Result<(), ApiError> {
        self.gateway.call_unit(ApiRequest::post(GROUPS).json(body)?).await
    }

    pub async fn update(&self, id: GroupRoutineId, body: &GroupRoutineRequest) -> Result<(), ApiError> {
        let request = ApiRequest::put(format!("{}/{}", GROUPS, id)).json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn delete(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::delete(format!("{}/{}", GROUPS, id)))
            .await
    }

    pub async fn join(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::post(format!("{}/{}/join", GROUPS, id)))
            .await
    }

    pub async fn leave(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::delete(format!("{}/{}/leave", GROUPS, id)))
            .await
    }

    pub async fn award_points(&self, id: GroupRoutineId, point: u32) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("{}/{}/points", GROUPS, id)).query("point", point);
        self.gateway.call_unit(request).await
    }

    pub async fn guestbooks(
        &self,
        id: GroupRoutineId,
        page: PageRequest,
    ) -> Result<Page<GuestbookItem>, ApiError> {
        let request = ApiRequest::get(format!("{}/{}/guestbooks", GROUPS, id))
            .query("page", page.page)
            .query("size", page.size);
        self.gateway.call(request).await
    }

    pub async fn write_guestbook(&self, id: GroupRoutineId, body: &GuestbookRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("{}/{}/guestbooks", GROUPS, id)).json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn delete_guestbook(&self, id: GroupRoutineId, guestbook_id: i64) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("{}/{}/guestbooks/{}", GROUPS, id, guestbook_id));
        self.gateway.call_unit(request).await
    }
}

pub struct PersonalRoutineApi {
    gateway: Arc<RequestGateway>,
}

impl PersonalRoutineApi {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        PersonalRoutineApi { gateway }
    }

    /// Lists for one day, given either as a `yyyy-mm-dd` date or a weekday name.
    pub async fn lists(
        &self,
        date: Option<&str>,
        day: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<PersonalRoutineListItem>, ApiError> {
        let request = ApiRequest::get(MY_ROUTINES)
            .query_opt("day", day)
            .query_opt("date", date)
            .query("page", page.page)
            .query("size", page.size);
        self.gateway.call(request).await
    }

    pub async fn create(&self, body: &PersonalRoutineListRequest) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::post(MY_ROUTINES).json(body)?)
            .await
    }

    pub async fn update(
        &self,
        id: PersonalRoutineListId,
        body: &PersonalRoutineListRequest,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::patch(format!("{}/{}", MY_ROUTINES, id)).json(body)?;
        self.gateway.call_unit(request).await
    }

    pub async fn delete(&self, id: PersonalRoutineListId) -> Result<(), ApiError> {
        self.gateway
            .call_unit(ApiRequest::delete(format!("{}/{}", MY_ROUTINES, id)))
            .await
    }

    /// Routines of one list on `date`. The backend does not pin this shape down.
    pub async fn details(&self, id: PersonalRoutineListId, date: &str) -> Result<Untyped, ApiError> {
        let request = ApiRequest::get(format!("{}/routine/{}", MY_ROUTINES, id)).query("date", date);
        self.gateway.call(request).await
    }

    pub async fn complete_routine(&self, routine_id: RoutineId, date: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(format!("{}/routine/complete/{}", MY_ROUTINES, routine_id))
            .query("date", date);
        self.gateway.call_unit(request).await
    }

    pub async fn complete_list(&self, id: PersonalRoutineListId, date: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::post(format!("{}/complete/{}", MY_ROUTINES, id)).query("date", date);
        self.gateway.call_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::HttpMethod;
    use crate::infra::FakeTransport;

    fn gateway(transport: Arc<FakeTransport>) -> Arc<RequestGateway> {
        let session = Arc::new(InMemorySessionStore::new(vec![]));
        Arc::new(RequestGateway::new(session, transport))
    }

    #[tokio::test]
    async fn group_list_sends_paging_and_filter() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            GROUPS,
            200,
            r#"{"isSuccess":true,"code":"COMMON200","message":"OK","result":{
                "page":0,"pageSize":10,"totalItems":0,"totalPages":0,"items":[]}}"#,
        );
        let api = GroupRoutineApi::new(gateway(transport.clone()));

        let page = api.list(PageRequest::first(10), Some(true)).await.unwrap();

        assert!(page.items.is_empty());
        let sent = &transport.requests()[0];
        assert_eq!(
            sent.query,
            vec![
                ("page".to_owned(), "0".to_owned()),
                ("size".to_owned(), "10".to_owned()),
                ("joined".to_owned(), "true".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn templates_omit_an_absent_category() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/api/v1/routines/templates",
            200,
            r#"{"isSuccess":true,"code":"COMMON200","message":"OK","result":{
                "page":0,"pageSize":10,"totalItems":1,"totalPages":1,"items":[
                {"templateId":3,"emojiId":"https://cdn/e.png","name":"물 마시기","content":"하루 2L"}]}}"#,
        );
        let api = RoutineCatalogApi::new(gateway(transport.clone()));

        let page = api.templates(None, PageRequest::first(10)).await.unwrap();

        assert_eq!(page.items[0].template_id, 3);
        let sent = &transport.requests()[0];
        assert!(sent.query.iter().all(|(name, _)| name != "category"));
    }

    #[tokio::test]
    async fn award_points_posts_point_as_query() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/api/v1/routines/groups/12/points", 200, "");
        let api = GroupRoutineApi::new(gateway(transport.clone()));

        api.award_points(GroupRoutineId(12), 30).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.query, vec![("point".to_owned(), "30".to_owned())]);
    }

    #[tokio::test]
    async fn completing_a_routine_carries_the_date() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("/api/v1/my-routine/list/routine/complete/5", 200, "");
        let api = PersonalRoutineApi::new(gateway(transport.clone()));

        api.complete_routine(RoutineId(5), "2025-03-01").await.unwrap();

        assert_eq!(
            transport.count(HttpMethod::Post, "/api/v1/my-routine/list/routine/complete/5"),
            1
        );
        assert_eq!(transport.requests()[0].query[0].1, "2025-03-01");
    }
}
