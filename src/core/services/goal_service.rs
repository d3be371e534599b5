use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{amount_or_zero, Ledger, SavingsGoal, SavingsGoalPatch};

use super::{ServiceError, ServiceResult};

/// Direction of a manual goal adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContributionKind {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub remaining: f64,
    /// Percentage of the target saved. Exceeds 100 once overfunded.
    pub progress: f64,
    pub achieved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    /// Days until the deadline; negative once it has passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_left: Option<i64>,
}

impl GoalProgress {
    pub fn display_progress(&self) -> f64 {
        self.progress.clamp(0.0, 100.0)
    }
}

pub struct GoalService;

impl GoalService {
    pub fn progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
        let target = amount_or_zero(goal.target_amount);
        let current = amount_or_zero(goal.current_amount);
        let progress = if target > 0.0 {
            current / target * 100.0
        } else {
            0.0
        };
        let deadline = goal.deadline_date();
        GoalProgress {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            target,
            current,
            remaining: (target - current).max(0.0),
            progress,
            achieved: target > 0.0 && current >= target,
            deadline,
            days_left: deadline.map(|date| (date - today).num_days()),
        }
    }

    pub fn progress_all(ledger: &Ledger, today: NaiveDate) -> Vec<GoalProgress> {
        ledger
            .savings_goals
            .iter()
            .map(|goal| Self::progress(goal, today))
            .collect()
    }

    /// Builds the patch for a deposit or withdrawal. The resulting balance
    /// never drops below zero.
    pub fn adjust(
        goal: &SavingsGoal,
        kind: ContributionKind,
        amount: f64,
    ) -> ServiceResult<SavingsGoalPatch> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Contribution amount must be greater than 0.".into(),
            ));
        }
        let current = amount_or_zero(goal.current_amount);
        let next = match kind {
            ContributionKind::Deposit => current + amount,
            ContributionKind::Withdraw => (current - amount).max(0.0),
        };
        Ok(SavingsGoalPatch {
            current_amount: Some(next),
            ..SavingsGoalPatch::default()
        })
    }
}
