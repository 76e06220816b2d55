use crate::domain_model::*;
use chrono::NaiveDate;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub is_completed: bool,
}

/// Gates the onboarding flow. Completion is one-way except for `reset`.
pub trait OnboardingStore: Send + Sync {
    fn is_completed(&self) -> bool;
    fn complete_onboarding(&self);
    fn reset(&self);
    fn subscribe(&self) -> watch::Receiver<OnboardingState>;
}

pub trait AnalysisPreferenceStore: Send + Sync {
    fn preferences(&self) -> AnalysisPreferences;
    fn set_period(&self, period: AnalysisPeriod);
    fn set_chart_type(&self, chart_type: ChartType);
    fn reset(&self);
    fn subscribe(&self) -> watch::Receiver<AnalysisPreferences>;
}

/// Profile of the signed-in user.
///
/// Answers that arrive after a request was sent are applied with [`UserProfileStore::edit`],
/// passing the generation read before the request. A `clear` in between
/// makes the edit a no-op, so a logged-out profile is never brought back.
pub trait UserProfileStore: Send + Sync {
    fn profile(&self) -> Option<UserProfile>;
    fn set_profile(&self, profile: UserProfile);
    /// Advances on every `clear`.
    fn generation(&self) -> u64;
    /// Returns whether the edit was applied. Only `MergeMyInfo` creates a
    /// missing profile.
    fn edit(&self, generation: u64, edit: ProfileEdit) -> bool;
    fn clear(&self);
    fn subscribe(&self) -> watch::Receiver<Option<UserProfile>>;
}

pub trait RoutineStore: Send + Sync {
    fn state(&self) -> RoutineState;
    fn set_selected_date(&self, date: NaiveDate);
    fn set_filter(&self, filter: RoutineFilter);
    fn set_active_routine(&self, id: Option<String>);
    fn set_edit_mode(&self, edit_mode: bool);
    fn mark_task_completed(&self, index: usize);
    fn reset_progress(&self);
    /// Back to today, all routines, nothing active.
    fn reset(&self);
    fn subscribe(&self) -> watch::Receiver<RoutineState>;
}

pub trait FinanceStore: Send + Sync {
    fn state(&self) -> FinanceState;
    fn set_balance(&self, balance: i64);
    fn set_budget(&self, budget: i64);
    fn set_total_expenses(&self, total: i64);
    fn set_category(&self, category: Option<ExpenseCategory>);
    fn add_expense(&self, amount: i64);
    fn reset(&self);
    fn subscribe(&self) -> watch::Receiver<FinanceState>;
}
