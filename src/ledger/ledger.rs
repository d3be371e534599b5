use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{category_key, sum_amounts, Budget, Expense, Income, SavingsGoal};

/// One user's full snapshot: every expense, income, budget and savings goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub user_id: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
}

impl Ledger {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
            && self.incomes.is_empty()
            && self.budgets.is_empty()
            && self.savings_goals.is_empty()
    }

    /// Distinct expense category labels in encounter order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.expenses
            .iter()
            .map(|expense| expense.category_label().to_string())
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Budgets whose category name matches no recorded expense.
    ///
    /// Budgets reference categories by name only, so a renamed category
    /// leaves its budgets here until the user edits them.
    pub fn orphaned_budgets(&self) -> Vec<&Budget> {
        let known: HashSet<&str> = self
            .expenses
            .iter()
            .map(Expense::category_label)
            .collect();
        self.budgets
            .iter()
            .filter(|budget| !known.contains(category_key(&budget.category)))
            .collect()
    }

    pub fn total_expenses(&self) -> f64 {
        sum_amounts(self.expenses.iter().map(Expense::amount))
    }

    pub fn total_income(&self) -> f64 {
        sum_amounts(self.incomes.iter().map(Income::amount))
    }

    /// Human-readable warnings about records the aggregations will skip.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for expense in &self.expenses {
            if expense.parsed_date().is_none() {
                warnings.push(format!(
                    "expense {} has unreadable date `{}`",
                    expense.id, expense.date
                ));
            }
        }
        for income in &self.incomes {
            if income.parsed_date().is_none() {
                warnings.push(format!(
                    "income {} has unreadable date `{}`",
                    income.id, income.date
                ));
            }
        }
        for budget in self.orphaned_budgets() {
            warnings.push(format!(
                "budget `{}` tracks category `{}` with no expenses",
                budget.name, budget.category
            ));
        }
        warnings
    }
}
