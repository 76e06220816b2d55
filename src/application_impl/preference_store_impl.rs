use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::Clock;
use crate::logger::*;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

pub struct InMemoryOnboardingStore {
    state: watch::Sender<OnboardingState>,
}

impl InMemoryOnboardingStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(OnboardingState::default());
        Self { state }
    }
}

impl Default for InMemoryOnboardingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingStore for InMemoryOnboardingStore {
    fn is_completed(&self) -> bool {
        self.state.borrow().is_completed
    }

    fn complete_onboarding(&self) {
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.is_completed, true));
    }

    fn reset(&self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.is_completed, false));
    }

    fn subscribe(&self) -> watch::Receiver<OnboardingState> {
        self.state.subscribe()
    }
}

pub struct InMemoryAnalysisPreferenceStore {
    state: watch::Sender<AnalysisPreferences>,
}

impl InMemoryAnalysisPreferenceStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AnalysisPreferences::default());
        Self { state }
    }
}

impl Default for InMemoryAnalysisPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPreferenceStore for InMemoryAnalysisPreferenceStore {
    fn preferences(&self) -> AnalysisPreferences {
        *self.state.borrow()
    }

    fn set_period(&self, period: AnalysisPeriod) {
        self.state
            .send_if_modified(|p| std::mem::replace(&mut p.selected_period, period) != period);
    }

    fn set_chart_type(&self, chart_type: ChartType) {
        self.state.send_if_modified(|p| {
            std::mem::replace(&mut p.selected_chart_type, chart_type) != chart_type
        });
    }

    fn reset(&self) {
        self.state
            .send_if_modified(|p| std::mem::take(p) != AnalysisPreferences::default());
    }

    fn subscribe(&self) -> watch::Receiver<AnalysisPreferences> {
        self.state.subscribe()
    }
}

/// Profile cache of the signed-in user. Cleared on logout.
pub struct InMemoryUserProfileStore {
    state: watch::Sender<Option<UserProfile>>,
    // only written under the channel lock
    generation: AtomicU64,
}

impl InMemoryUserProfileStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryUserProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserProfileStore for InMemoryUserProfileStore {
    fn profile(&self) -> Option<UserProfile> {
        self.state.borrow().clone()
    }

    fn set_profile(&self, profile: UserProfile) {
        self.state.send_replace(Some(profile));
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn edit(&self, generation: u64, edit: ProfileEdit) -> bool {
        let applied = self.state.send_if_modified(|p| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            if p.is_none() && !edit.creates_profile() {
                return false;
            }
            p.get_or_insert_with(UserProfile::default).apply(edit);
            true
        });
        if !applied {
            debug!(generation, "profile edit skipped");
        }
        applied
    }

    fn clear(&self) {
        self.state.send_if_modified(|p| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            p.take().is_some()
        });
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.state.subscribe()
    }
}

impl LogoutListener for InMemoryUserProfileStore {
    fn on_logout(&self) {
        self.clear();
    }
}

/// Routine screen selections. The date resets to the clock's current day.
pub struct InMemoryRoutineStore {
    state: watch::Sender<RoutineState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoutineStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(RoutineState::on(clock.now().date_naive()));
        Self { state, clock }
    }
}

impl RoutineStore for InMemoryRoutineStore {
    fn state(&self) -> RoutineState {
        self.state.borrow().clone()
    }

    fn set_selected_date(&self, date: NaiveDate) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.selected_date, date) != date);
    }

    fn set_filter(&self, filter: RoutineFilter) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.routine_filter, filter) != filter);
    }

    fn set_active_routine(&self, id: Option<String>) {
        self.state.send_if_modified(|s| {
            if s.active_routine_id == id {
                return false;
            }
            s.active_routine_id = id;
            true
        });
    }

    fn set_edit_mode(&self, edit_mode: bool) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.edit_mode, edit_mode) != edit_mode);
    }

    fn mark_task_completed(&self, index: usize) {
        self.state.send_if_modified(|s| s.completed_tasks.insert(index));
    }

    fn reset_progress(&self) {
        self.state.send_if_modified(|s| {
            let had_progress = !s.completed_tasks.is_empty();
            s.completed_tasks.clear();
            had_progress
        });
    }

    fn reset(&self) {
        let fresh = RoutineState::on(self.clock.now().date_naive());
        self.state.send_if_modified(|s| {
            if *s == fresh {
                return false;
            }
            *s = fresh;
            true
        });
    }

    fn subscribe(&self) -> watch::Receiver<RoutineState> {
        self.state.subscribe()
    }
}

impl LogoutListener for InMemoryRoutineStore {
    fn on_logout(&self) {
        self.reset();
    }
}

pub struct InMemoryFinanceStore {
    state: watch::Sender<FinanceState>,
}

impl InMemoryFinanceStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FinanceState::default());
        Self { state }
    }

    fn update(&self, f: impl FnOnce(&mut FinanceState)) {
        self.state.send_if_modified(|s| {
            let before = *s;
            f(s);
            *s != before
        });
    }
}

impl Default for InMemoryFinanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceStore for InMemoryFinanceStore {
    fn state(&self) -> FinanceState {
        *self.state.borrow()
    }

    fn set_balance(&self, balance: i64) {
        self.update(|s| s.snapshot.current_balance = balance);
    }

    fn set_budget(&self, budget: i64) {
        self.update(|s| s.snapshot.monthly_budget = budget);
    }

    fn set_total_expenses(&self, total: i64) {
        self.update(|s| s.snapshot.total_expenses = total);
    }

    fn set_category(&self, category: Option<ExpenseCategory>) {
        self.update(|s| s.selected_category = category);
    }

    fn add_expense(&self, amount: i64) {
        self.update(|s| s.snapshot.add_expense(amount));
    }

    fn reset(&self) {
        self.update(|s| *s = FinanceState::default());
    }

    fn subscribe(&self) -> watch::Receiver<FinanceState> {
        self.state.subscribe()
    }
}

impl LogoutListener for InMemoryFinanceStore {
    fn on_logout(&self) {
        self.reset();
    }
}
