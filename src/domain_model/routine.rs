use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRoutineId(pub i64);

impl fmt::Display for GroupRoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalRoutineListId(pub i64);

impl fmt::Display for PersonalRoutineListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineId(pub i64);

impl fmt::Display for RoutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutineType {
    Daily,
    Finance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        PageRequest { page: 0, size }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn next_page(&self) -> Option<u32> {
        (self.page + 1 < self.total_pages).then_some(self.page + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRoutineItem {
    pub id: GroupRoutineId,
    pub routine_type: RoutineType,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub routine_nums: u32,
    #[serde(default)]
    pub people_nums: Option<u32>,
    #[serde(default)]
    pub percent: Option<f64>,
    pub day_of_week: Vec<String>,
    #[serde(default)]
    pub joined: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRoutineInfo {
    pub id: GroupRoutineId,
    pub routine_type: RoutineType,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub routine_nums: u32,
    pub people_nums: u32,
    pub day_of_week: Vec<String>,
    pub joined: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineInfo {
    pub id: RoutineId,
    pub emoji_id: i64,
    pub name: String,
    pub time: u32,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberInfo {
    pub success_people_nums: u32,
    pub success_people_profile_image_url: Vec<String>,
    pub failed_people_nums: u32,
    pub failed_people_profile_image_url: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRoutineDetail {
    pub admin: bool,
    pub group_routine_info: GroupRoutineInfo,
    #[serde(default)]
    pub routine_infos: Vec<RoutineInfo>,
    #[serde(default)]
    pub group_routine_member_info: Option<GroupMemberInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRoutineRequest {
    pub title: String,
    pub description: String,
    pub routine_type: RoutineType,
    pub start_time: String,
    pub end_time: String,
    pub days_of_week: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookItem {
    pub id: i64,
    pub user_id: i64,
    pub nickname: String,
    pub profile_image_url: String,
    pub content: String,
    pub created_at: String,
    pub is_writer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestbookRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRoutineListItem {
    pub id: PersonalRoutineListId,
    pub routine_type: RoutineType,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub routine_nums: u32,
    pub percent: f64,
    pub day_of_week: Vec<String>,
    #[serde(default)]
    pub success_day: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRoutineListRequest {
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub routine_type: RoutineType,
    pub day_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineTemplate {
    pub template_id: i64,
    /// Emoji image URL.
    pub emoji_id: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineEmoji {
    pub emoji_id: i64,
    pub emoji_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmojiList {
    pub items: Vec<RoutineEmoji>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineFilter {
    #[default]
    All,
    Personal,
    Group,
}

/// Routine screen state. Edit mode and task progress live for the session only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineState {
    pub selected_date: NaiveDate,
    pub routine_filter: RoutineFilter,
    pub active_routine_id: Option<String>,
    pub edit_mode: bool,
    pub completed_tasks: BTreeSet<usize>,
}

impl RoutineState {
    pub fn on(date: NaiveDate) -> Self {
        RoutineState {
            selected_date: date,
            routine_filter: RoutineFilter::default(),
            active_routine_id: None,
            edit_mode: false,
            completed_tasks: BTreeSet::new(),
        }
    }
}

/// What `routine-storage` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRoutineState {
    pub selected_date: NaiveDate,
    pub routine_filter: RoutineFilter,
    pub active_routine_id: Option<String>,
}

impl From<&RoutineState> for PersistedRoutineState {
    fn from(state: &RoutineState) -> Self {
        PersistedRoutineState {
            selected_date: state.selected_date,
            routine_filter: state.routine_filter,
            active_routine_id: state.active_routine_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_stops_at_last() {
        let page = Page::<u8> {
            page: 1,
            page_size: 10,
            total_items: 20,
            total_pages: 2,
            items: vec![],
        };
        assert_eq!(page.next_page(), None);
        let first = Page { page: 0, ..page };
        assert_eq!(first.next_page(), Some(1));
    }

    #[test]
    fn detail_for_non_participant_has_no_member_info() {
        let json = r#"{
            "admin": false,
            "groupRoutineInfo": {
                "id": 7, "routineType": "DAILY", "title": "t", "description": "d",
                "startTime": "07:00", "endTime": "08:00", "routineNums": 2,
                "peopleNums": 5, "dayOfWeek": ["월"], "joined": false
            }
        }"#;
        let detail: GroupRoutineDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.group_routine_info.id, GroupRoutineId(7));
        assert!(detail.routine_infos.is_empty());
        assert!(detail.group_routine_member_info.is_none());
    }

    #[test]
    fn task_progress_is_not_persisted() {
        let mut state = RoutineState::on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        state.edit_mode = true;
        state.completed_tasks.insert(2);
        state.active_routine_id = Some("12".into());

        let json = serde_json::to_value(PersistedRoutineState::from(&state)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "selectedDate": "2025-03-01",
                "routineFilter": "all",
                "activeRoutineId": "12"
            })
        );
    }
}
