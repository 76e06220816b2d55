use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Shopping,
    Entertainment,
    Health,
    Education,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinanceState {
    pub snapshot: FinanceSnapshot,
    pub selected_category: Option<ExpenseCategory>,
}

/// Balance figures kept across restarts in `finance-storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSnapshot {
    pub current_balance: i64,
    pub monthly_budget: i64,
    pub total_expenses: i64,
}

impl FinanceSnapshot {
    /// Adds to the expenses and takes the amount off the balance, which stops at zero.
    pub fn add_expense(&mut self, amount: i64) {
        self.total_expenses = self.total_expenses.saturating_add(amount);
        self.current_balance = self.current_balance.saturating_sub(amount).max(0);
    }
}
