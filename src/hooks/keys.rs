use crate::domain_model::*;

pub const DAILY_RECOMMENDATION: &str = "recommendDaily";
pub const CATEGORY_ANALYSIS: &str = "categoryAnalysis";
pub const WEEKLY_SPENDING: &str = "weeklySpendingAnalysis";
pub const MAX_STREAK: &str = "maxStreak";
pub const GROUP_ROUTINES: &str = "groupRoutines";
pub const MY_GROUP_ROUTINES: &str = "myGroupRoutines";
pub const SEARCH_GROUP_ROUTINES: &str = "searchGroupRoutines";
pub const GROUP_ROUTINE_DETAIL: &str = "groupRoutineDetail";
pub const GROUP_GUESTBOOKS: &str = "groupGuestbooks";
pub const PERSONAL_ROUTINES: &str = "personalRoutines";
pub const PERSONAL_ROUTINE_DETAILS: &str = "personalRoutineDetails";
pub const MY_TICKETS: &str = "myTickets";
pub const MY_POINT: &str = "myPoint";
pub const PRODUCT_DETAIL: &str = "productDetail";
pub const MY_INFO: &str = "myInfo";
pub const RANKING: &str = "ranking";
pub const ROUTINE_TEMPLATES: &str = "routineTemplates";
pub const ROUTINE_EMOJIS: &str = "routineEmojis";
pub const EMAIL_CHECK: &str = "checkEmailDuplicate";
pub const NICKNAME_CHECK: &str = "checkNicknameDuplicate";

/// Every key of one resource.
pub fn all(resource: &str) -> QueryKey {
    QueryKey::new(resource)
}

pub fn group_routines(page: PageRequest, joined: Option<bool>) -> QueryKey {
    QueryKey::new(GROUP_ROUTINES)
        .with(page.page)
        .with(page.size)
        .with_opt("joined", joined)
}

pub fn my_group_routines(page: PageRequest) -> QueryKey {
    QueryKey::new(MY_GROUP_ROUTINES).with(page.page).with(page.size)
}

pub fn search_group_routines(keyword: &str) -> QueryKey {
    QueryKey::new(SEARCH_GROUP_ROUTINES).with(keyword)
}

pub fn group_routine_detail(id: GroupRoutineId) -> QueryKey {
    QueryKey::new(GROUP_ROUTINE_DETAIL).with(id)
}

pub fn group_guestbooks(id: GroupRoutineId, page: PageRequest) -> QueryKey {
    QueryKey::new(GROUP_GUESTBOOKS)
        .with(id)
        .with(page.page)
        .with(page.size)
}

/// Lists of one date; a prefix of every paged list key for that date.
pub fn personal_routines_on(date: &str) -> QueryKey {
    QueryKey::new(PERSONAL_ROUTINES).with_opt("date", Some(date))
}

pub fn personal_routines(date: Option<&str>, day: Option<&str>, page: PageRequest) -> QueryKey {
    QueryKey::new(PERSONAL_ROUTINES)
        .with_opt("date", date)
        .with_opt("day", day)
        .with(page.page)
        .with(page.size)
}

pub fn personal_routine_details(id: PersonalRoutineListId, date: &str) -> QueryKey {
    QueryKey::new(PERSONAL_ROUTINE_DETAILS).with(id).with(date)
}

pub fn product_detail(product_id: i64) -> QueryKey {
    QueryKey::new(PRODUCT_DETAIL).with(product_id)
}

pub fn routine_templates(category: Option<&str>, page: PageRequest) -> QueryKey {
    QueryKey::new(ROUTINE_TEMPLATES)
        .with_opt("category", category)
        .with(page.page)
        .with(page.size)
}

pub fn routine_emojis(category: Option<&str>, page: PageRequest) -> QueryKey {
    QueryKey::new(ROUTINE_EMOJIS)
        .with_opt("category", category)
        .with(page.page)
        .with(page.size)
}

pub fn email_check(email: &str) -> QueryKey {
    QueryKey::new(EMAIL_CHECK).with(email)
}

pub fn nickname_check(nickname: &str) -> QueryKey {
    QueryKey::new(NICKNAME_CHECK).with(nickname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_prefix_covers_paged_lists_of_that_date() {
        let key = personal_routines(Some("2025-03-01"), None, PageRequest::first(10));
        assert!(key.starts_with(&personal_routines_on("2025-03-01")));
        assert!(!key.starts_with(&personal_routines_on("2025-03-02")));
        assert!(key.starts_with(&all(PERSONAL_ROUTINES)));
    }

    #[test]
    fn joined_filter_is_part_of_the_key() {
        let page = PageRequest::first(10);
        assert_ne!(group_routines(page, None), group_routines(page, Some(true)));
    }
}
