//! Ledger records, drafts, partial-update patches and period arithmetic.

pub mod budget;
pub mod expense;
pub mod income;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod savings_goal;

pub use budget::{Budget, BudgetDraft, BudgetPatch, BudgetPeriod};
pub use expense::{Expense, ExpenseDraft, ExpensePatch, LineItem};
pub use income::{Income, IncomeDraft, IncomePatch};
pub use ledger::Ledger;
pub use period::{parse_iso_date, DatePreset, PeriodRange};
pub use savings_goal::{SavingsGoal, SavingsGoalDraft, SavingsGoalPatch};

use crate::errors::LedgerError;

/// Label for expenses recorded without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Label for expenses recorded without a vendor.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";
/// Label for income recorded without a source.
pub const OTHER_INCOME: &str = "Other Income";

pub(crate) fn label_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

pub(crate) fn amount_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sum that starts from `+0.0`, so an empty input is never `-0.0`.
pub(crate) fn sum_amounts(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, value| acc + value)
}

/// Category key used wherever expenses and budgets are matched by name.
pub(crate) fn category_key(raw: &str) -> &str {
    label_or(raw, UNCATEGORIZED)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(format!("{field} is required.")));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<(), LedgerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::validation(format!(
            "{field} must be greater than 0."
        )));
    }
    Ok(())
}

pub(crate) fn require_date(field: &str, value: &str) -> Result<(), LedgerError> {
    require_text(field, value)?;
    if parse_iso_date(value).is_none() {
        return Err(LedgerError::validation(format!(
            "{field} `{value}` is not a valid date."
        )));
    }
    Ok(())
}
