use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{period::parse_iso_date, require_positive, require_text};
use crate::errors::LedgerError;

/// A target amount the user is saving towards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl SavingsGoal {
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline.as_deref().and_then(parse_iso_date)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        SavingsGoalDraft::from(self.clone()).validate()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalDraft {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl SavingsGoalDraft {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        require_text("Goal name", &self.name)?;
        require_positive("Target amount", self.target_amount)?;
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(LedgerError::validation("Current amount cannot be negative."));
        }
        if let Some(deadline) = self.deadline.as_deref().filter(|d| !d.trim().is_empty()) {
            if parse_iso_date(deadline).is_none() {
                return Err(LedgerError::validation(format!(
                    "Deadline `{deadline}` is not a valid date."
                )));
            }
        }
        Ok(())
    }

    pub fn into_record(self, id: impl Into<String>, user_id: impl Into<String>) -> SavingsGoal {
        SavingsGoal {
            id: id.into(),
            user_id: user_id.into(),
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
        }
    }
}

impl From<SavingsGoal> for SavingsGoalDraft {
    fn from(goal: SavingsGoal) -> Self {
        Self {
            name: goal.name,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            deadline: goal.deadline,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl SavingsGoalPatch {
    pub fn apply(&self, goal: &mut SavingsGoal) {
        if let Some(value) = &self.name {
            goal.name = value.clone();
        }
        if let Some(value) = self.target_amount {
            goal.target_amount = value;
        }
        if let Some(value) = self.current_amount {
            goal.current_amount = value;
        }
        if let Some(value) = &self.deadline {
            goal.deadline = Some(value.clone());
        }
    }
}
