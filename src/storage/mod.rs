//! Record stores: the [`LedgerStore`] contract, an in-memory implementation
//! with per-user change subscriptions, and a JSON file backend.

pub mod json_backend;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::{
    errors::LedgerError,
    ledger::{
        Budget, BudgetDraft, BudgetPatch, Expense, ExpenseDraft, ExpensePatch, Income, IncomeDraft,
        IncomePatch, Ledger, SavingsGoal, SavingsGoalDraft, SavingsGoalPatch,
    },
};

pub use json_backend::JsonSnapshotStorage;
pub use memory::{LedgerCallback, MemoryLedgerStore, SubscriptionId};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Everything a store holds, across all users.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
}

impl StoreData {
    /// One user's records as a snapshot.
    pub fn ledger_for(&self, user_id: &str) -> Ledger {
        Ledger {
            user_id: user_id.to_string(),
            expenses: owned_by(&self.expenses, user_id, |e| &e.user_id),
            incomes: owned_by(&self.incomes, user_id, |i| &i.user_id),
            budgets: owned_by(&self.budgets, user_id, |b| &b.user_id),
            savings_goals: owned_by(&self.savings_goals, user_id, |g| &g.user_id),
        }
    }

    /// Distinct owners in first-seen order.
    pub fn user_ids(&self) -> Vec<String> {
        let mut users: Vec<String> = Vec::new();
        let owners = self
            .expenses
            .iter()
            .map(|e| e.user_id.as_str())
            .chain(self.incomes.iter().map(|i| i.user_id.as_str()))
            .chain(self.budgets.iter().map(|b| b.user_id.as_str()))
            .chain(self.savings_goals.iter().map(|g| g.user_id.as_str()));
        for owner in owners {
            if !users.iter().any(|known| known == owner) {
                users.push(owner.to_string());
            }
        }
        users
    }
}

fn owned_by<T: Clone>(records: &[T], user_id: &str, owner: impl Fn(&T) -> &String) -> Vec<T> {
    records
        .iter()
        .filter(|record| owner(record) == user_id)
        .cloned()
        .collect()
}

/// Per-user CRUD over the four record kinds.
///
/// Adds take form data and return the stored record with its assigned id.
/// Updates apply a partial patch and validate the result before storing it.
pub trait LedgerStore: Send + Sync {
    fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>>;
    fn list_incomes(&self, user_id: &str) -> Result<Vec<Income>>;
    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;

    fn snapshot(&self, user_id: &str) -> Result<Ledger> {
        Ok(Ledger {
            user_id: user_id.to_string(),
            expenses: self.list_expenses(user_id)?,
            incomes: self.list_incomes(user_id)?,
            budgets: self.list_budgets(user_id)?,
            savings_goals: self.list_savings_goals(user_id)?,
        })
    }

    fn add_expense(&self, user_id: &str, draft: ExpenseDraft) -> Result<Expense>;
    fn update_expense(&self, id: &str, patch: &ExpensePatch) -> Result<Expense>;
    fn delete_expense(&self, id: &str) -> Result<()>;

    fn add_income(&self, user_id: &str, draft: IncomeDraft) -> Result<Income>;
    fn update_income(&self, id: &str, patch: &IncomePatch) -> Result<Income>;
    fn delete_income(&self, id: &str) -> Result<()>;

    fn add_budget(&self, user_id: &str, draft: BudgetDraft) -> Result<Budget>;
    fn update_budget(&self, id: &str, patch: &BudgetPatch) -> Result<Budget>;
    fn delete_budget(&self, id: &str) -> Result<()>;

    fn add_savings_goal(&self, user_id: &str, draft: SavingsGoalDraft) -> Result<SavingsGoal>;
    fn update_savings_goal(&self, id: &str, patch: &SavingsGoalPatch) -> Result<SavingsGoal>;
    fn delete_savings_goal(&self, id: &str) -> Result<()>;
}
