use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{category_key, require_positive, require_text};
use crate::errors::LedgerError;

/// A spending guardrail for one expense category.
///
/// `category` is a weak reference: it matches `Expense::category` by name and
/// nothing keeps the two in sync when a category is renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn validate(&self) -> Result<(), LedgerError> {
        BudgetDraft::from(self.clone()).validate()
    }

    /// True when `category` refers to the same category as this budget.
    pub fn tracks(&self, category: &str) -> bool {
        category_key(&self.category) == category_key(category)
    }
}

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetPeriod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            "yearly" | "year" | "annual" => Ok(BudgetPeriod::Yearly),
            other => Err(LedgerError::validation(format!(
                "unknown budget period `{other}`"
            ))),
        }
    }
}

/// Budget form data before the store assigns an id and owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDraft {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl BudgetDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        period: BudgetPeriod,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount,
            period,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        require_text("Budget name", &self.name)?;
        require_text("Budget category", &self.category)?;
        require_positive("Budget amount", self.amount)
    }

    pub fn into_record(self, id: impl Into<String>, user_id: impl Into<String>) -> Budget {
        Budget {
            id: id.into(),
            user_id: user_id.into(),
            name: self.name,
            category: self.category,
            amount: self.amount,
            period: self.period,
        }
    }
}

impl From<Budget> for BudgetDraft {
    fn from(budget: Budget) -> Self {
        Self {
            name: budget.name,
            category: budget.category,
            amount: budget.amount,
            period: budget.period,
        }
    }
}

/// Partial-field replacement for a stored budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
}

impl BudgetPatch {
    pub fn apply(&self, budget: &mut Budget) {
        if let Some(name) = &self.name {
            budget.name = name.clone();
        }
        if let Some(category) = &self.category {
            budget.category = category.clone();
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(period) = self.period {
            budget.period = period;
        }
    }
}
