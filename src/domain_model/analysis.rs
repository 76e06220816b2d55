use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecommendation {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category_name: String,
    pub amount: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub average_spending_for20s: i64,
    pub my_total_spending: i64,
    pub comparison_percentage: f64,
    pub category_spendings: Vec<CategorySpending>,
}

/// Weekly spending commentary, one line per remark.
pub type WeeklySpending = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxStreak {
    pub streak_days: u32,
}

/// Outcome of claiming the 7-day streak reward.
///
/// The two non-granted variants are expected answers, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyPointOutcome {
    Granted,
    StreakNotMet,
    AlreadyClaimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPeriod {
    #[default]
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Expense,
    Routine,
    Achievement,
}

/// Analysis screen selections kept across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPreferences {
    pub selected_period: AnalysisPeriod,
    pub selected_chart_type: ChartType,
}
