use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{
    category_key, sum_amounts, Budget, BudgetPeriod, Expense, Ledger, PeriodRange,
};

/// How a budget stands inside its current period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    /// Spending is ahead of the calendar but the limit is not reached.
    Pacing,
    /// Spent at or beyond the limit.
    Exhausted,
    /// The stored amount is zero, negative or not a number.
    Invalid,
}

impl BudgetStatus {
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Pacing => "pacing ahead",
            BudgetStatus::Exhausted => "exhausted",
            BudgetStatus::Invalid => "invalid amount",
        }
    }
}

/// Spending against one budget over the period containing the evaluation day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: String,
    pub name: String,
    pub category: String,
    pub period: BudgetPeriod,
    pub range: PeriodRange,
    pub spent: f64,
    pub remaining: f64,
    /// Percentage of the limit spent. Unclamped, so it may exceed 100.
    pub progress: f64,
    pub spent_ratio: f64,
    pub elapsed_ratio: f64,
    pub pacing_alert: bool,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    /// Progress clamped to `[0, 100]` for progress bars.
    pub fn display_progress(&self) -> f64 {
        self.progress.clamp(0.0, 100.0)
    }

    pub fn is_over_budget(&self) -> bool {
        self.status == BudgetStatus::Exhausted && self.remaining < 0.0
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Sum of expenses in `category` whose date falls in `range`. Categories
    /// match on their trimmed label; expenses with unparseable dates are
    /// skipped.
    pub fn spent_in_range(category: &str, expenses: &[Expense], range: &PeriodRange) -> f64 {
        let key = category_key(category);
        sum_amounts(
            expenses
                .iter()
                .filter(|expense| expense.category_label() == key)
                .filter(|expense| expense.parsed_date().is_some_and(|date| range.contains(date)))
                .map(Expense::amount),
        )
    }

    pub fn evaluate(budget: &Budget, expenses: &[Expense], today: NaiveDate) -> BudgetProgress {
        let range = PeriodRange::for_budget_period(budget.period, today);
        let spent = Self::spent_in_range(&budget.category, expenses, &range);
        let elapsed_ratio = range.elapsed_ratio(today);
        let amount = budget.amount;

        let valid = amount.is_finite() && amount > 0.0;
        let (progress, spent_ratio, remaining) = if valid {
            let ratio = spent / amount;
            (ratio * 100.0, ratio, amount - spent)
        } else {
            (0.0, 0.0, 0.0 - spent)
        };
        let pacing_alert = valid && spent_ratio > elapsed_ratio && spent < amount;
        let status = if !valid {
            BudgetStatus::Invalid
        } else if spent >= amount {
            BudgetStatus::Exhausted
        } else if pacing_alert {
            BudgetStatus::Pacing
        } else {
            BudgetStatus::OnTrack
        };

        BudgetProgress {
            budget_id: budget.id.clone(),
            name: budget.name.clone(),
            category: budget.category.clone(),
            period: budget.period,
            range,
            spent,
            remaining,
            progress,
            spent_ratio,
            elapsed_ratio,
            pacing_alert,
            status,
        }
    }

    pub fn evaluate_all(
        budgets: &[Budget],
        expenses: &[Expense],
        today: NaiveDate,
    ) -> Vec<BudgetProgress> {
        budgets
            .iter()
            .map(|budget| Self::evaluate(budget, expenses, today))
            .collect()
    }

    pub fn evaluate_ledger(ledger: &Ledger, today: NaiveDate) -> Vec<BudgetProgress> {
        Self::evaluate_all(&ledger.budgets, &ledger.expenses, today)
    }

    /// Budgets that need attention: pacing ahead or exhausted.
    pub fn alerts(progress: &[BudgetProgress]) -> Vec<&BudgetProgress> {
        progress
            .iter()
            .filter(|entry| entry.pacing_alert || entry.status == BudgetStatus::Exhausted)
            .collect()
    }
}
