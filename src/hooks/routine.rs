use crate::api::v1::{GroupRoutineApi, PersonalRoutineApi, RoutineCatalogApi};
use crate::application_impl::*;
use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::hooks::keys;
use std::sync::Arc;
use std::time::Duration;

pub struct GroupRoutineHooks {
    cache: QueryCache,
    api: Arc<GroupRoutineApi>,
}

impl GroupRoutineHooks {
    pub fn new(cache: QueryCache, api: Arc<GroupRoutineApi>) -> Self {
        GroupRoutineHooks { cache, api }
    }

    fn lists() -> [QueryKey; 2] {
        [
            keys::all(keys::GROUP_ROUTINES),
            keys::all(keys::MY_GROUP_ROUTINES),
        ]
    }

    pub async fn list(
        &self,
        page: PageRequest,
        joined: Option<bool>,
    ) -> Result<Arc<Page<GroupRoutineItem>>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::group_routines(page, joined), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.list(page, joined).await }
            })
            .await
    }

    pub async fn mine(&self, page: PageRequest) -> Result<Arc<Page<GroupRoutineItem>>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::my_group_routines(page), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.mine(page).await }
            })
            .await
    }

    pub async fn search(&self, keyword: &str) -> Result<Arc<Page<GroupRoutineItem>>, ApiError> {
        let api = self.api.clone();
        let owned = keyword.to_owned();
        self.cache
            .query(keys::search_group_routines(keyword), self.cache.defaults(), move || {
                let api = api.clone();
                let keyword = owned.clone();
                async move { api.search(&keyword).await }
            })
            .await
    }

    pub async fn detail(&self, id: GroupRoutineId) -> Result<Arc<GroupRoutineDetail>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::group_routine_detail(id), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.detail(id).await }
            })
            .await
    }

    pub async fn guestbooks(
        &self,
        id: GroupRoutineId,
        page: PageRequest,
    ) -> Result<Arc<Page<GuestbookItem>>, ApiError> {
        let api = self.api.clone();
        self.cache
            .query(keys::group_guestbooks(id, page), self.cache.defaults(), move || {
                let api = api.clone();
                async move { api.guestbooks(id, page).await }
            })
            .await
    }

    pub async fn create(&self, body: &GroupRoutineRequest) -> Result<(), ApiError> {
        self.cache.mutate(&Self::lists(), self.api.create(body)).await
    }

    pub async fn update(&self, id: GroupRoutineId, body: &GroupRoutineRequest) -> Result<(), ApiError> {
        let [groups, mine] = Self::lists();
        self.cache
            .mutate(&[groups, mine, keys::group_routine_detail(id)], self.api.update(id, body))
            .await
    }

    pub async fn delete(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        let [groups, mine] = Self::lists();
        self.cache
            .mutate(&[groups, mine, keys::group_routine_detail(id)], self.api.delete(id))
            .await
    }

    pub async fn join(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        let [groups, mine] = Self::lists();
        self.cache
            .mutate(&[groups, mine, keys::group_routine_detail(id)], self.api.join(id))
            .await
    }

    pub async fn leave(&self, id: GroupRoutineId) -> Result<(), ApiError> {
        let [groups, mine] = Self::lists();
        self.cache
            .mutate(&[groups, mine, keys::group_routine_detail(id)], self.api.leave(id))
            .await
    }

    pub async fn award_points(&self, id: GroupRoutineId, point: u32) -> Result<(), ApiError> {
        self.cache
            .mutate(
                &[keys::group_routine_detail(id), keys::all(keys::MY_GROUP_ROUTINES)],
                self.api.award_points(id, point),
            )
            .await
    }

    pub async fn write_guestbook(&self, id: GroupRoutineId, body: &GuestbookRequest) -> Result<(), ApiError> {
        let guestbooks = keys::all(keys::GROUP_GUESTBOOKS).with(id);
        self.cache
            .mutate(&[guestbooks], self.api.write_guestbook(id, body))
            .await
    }

    pub async fn delete_guestbook(&self, id: GroupRoutineId, guestbook_id: i64) -> Result<(), ApiError> {
        let guestbooks = keys::all(keys::GROUP_GUESTBOOKS).with(id);
        self.cache
            .mutate(&[guestbooks], self.api.delete_guestbook(id, guestbook_id))
            .await
    }
}

pub struct PersonalRoutineHooks {
    cache: QueryCache,
    api: Arc<PersonalRoutineApi>,
}

impl PersonalRoutineHooks {
    pub fn new(cache: QueryCache, api: Arc<PersonalRoutineApi>) -> Self {
        PersonalRoutineHooks { cache, api }
    }

    pub async fn lists(
        &self,
        date: Option<&str>,
        day: Option<&str>,
        page: PageRequest,
    ) -> Result<Arc<Page<PersonalRoutineListItem>>, ApiError> {
        let api = self.api.clone();
        let key = keys::personal_routines(date, day, page);
        let date = date.map(str::to_owned);
        let day = day.map(str::to_owned);
        self.cache
            .query(key, self.cache.defaults(), move || {
                let api = api.clone();
                let (date, day) = (date.clone(), day.clone());
                async move { api.lists(date.as_deref(), day.as_deref(), page).await }
            })
            .await
    }

    pub async fn details(&self, id: PersonalRoutineListId, date: &str) -> Result<Arc<Untyped>, ApiError> {
        let api = self.api.clone();
        let owned = date.to_owned();
        self.cache
            .query(keys::personal_routine_details(id, date), self.cache.defaults(), move || {
                let api = api.clone();
                let date = owned.clone();
                async move { api.details(id, &date).await }
            })
            .await
    }

    pub async fn create(&self, body: &PersonalRoutineListRequest) -> Result<(), ApiError> {
        self.cache
            .mutate(&[keys::all(keys::PERSONAL_ROUTINES)], self.api.create(body))
            .await
    }

    pub async fn update(&self, id: PersonalRoutineListId, body: &PersonalRoutineListRequest) -> Result<(), ApiError> {
        self.cache
            .mutate(
                &[
                    keys::all(keys::PERSONAL_ROUTINES),
                    keys::all(keys::PERSONAL_ROUTINE_DETAILS).with(id),
                ],
                self.api.update(id, body),
            )
            .await
    }

    pub async fn delete(&self, id: PersonalRoutineListId) -> Result<(), ApiError> {
        self.cache
            .mutate(
                &[
                    keys::all(keys::PERSONAL_ROUTINES),
                    keys::all(keys::PERSONAL_ROUTINE_DETAILS).with(id),
                ],
                self.api.delete(id),
            )
            .await
    }

    /// Ticks one routine off; the day's lists and every detail view refresh.
    pub async fn complete_routine(&self, routine_id: RoutineId, date: &str) -> Result<(), ApiError> {
        self.cache
            .mutate(
                &[
                    keys::personal_routines_on(date),
                    keys::all(keys::PERSONAL_ROUTINE_DETAILS),
                ],
                self.api.complete_routine(routine_id, date),
            )
            .await
    }

    pub async fn complete_list(&self, id: PersonalRoutineListId, date: &str) -> Result<(), ApiError> {
        self.cache
            .mutate(
                &[
                    keys::all(keys::PERSONAL_ROUTINES),
                    keys::all(keys::PERSONAL_ROUTINE_DETAILS),
                ],
                self.api.complete_list(id, date),
            )
            .await
    }
}

/// Templates change rarely; emojis are cached per category.
pub struct RoutineCatalogHooks {
    cache: QueryCache,
    api: Arc<RoutineCatalogApi>,
}

impl RoutineCatalogHooks {
    pub fn new(cache: QueryCache, api: Arc<RoutineCatalogApi>) -> Self {
        RoutineCatalogHooks { cache, api }
    }

    pub async fn templates(
        &self,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Arc<Page<RoutineTemplate>>, ApiError> {
        let api = self.api.clone();
        let owned = category.map(str::to_owned);
        let options = self
            .cache
            .defaults()
            .with_windows(Duration::from_secs(60 * 60), Duration::from_secs(2 * 60 * 60));
        self.cache
            .query(keys::routine_templates(category, page), options, move || {
                let api = api.clone();
                let category = owned.clone();
                async move { api.templates(category.as_deref(), page).await }
            })
            .await
    }

    pub async fn emojis(&self, category: Option<&str>, page: PageRequest) -> Result<Arc<EmojiList>, ApiError> {
        let api = self.api.clone();
        let owned = category.map(str::to_owned);
        let options = self
            .cache
            .defaults()
            .with_windows(Duration::from_secs(5 * 60), Duration::from_secs(30 * 60));
        self.cache
            .query(keys::routine_emojis(category, page), options, move || {
                let api = api.clone();
                let category = owned.clone();
                async move { api.emojis(category.as_deref(), page).await }
            })
            .await
    }
}
