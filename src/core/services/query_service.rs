use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::ledger::{Expense, PeriodRange};

/// Number of expenses shown on the dashboard's recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 15;
/// Category selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Transaction-list filter. Every criterion is optional and they combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the vendor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<PeriodRange>,
}

impl ExpenseFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the category; `"all"` clears it.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().eq_ignore_ascii_case(ALL_CATEGORIES) {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn with_range(mut self, range: PeriodRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => expense
                .vendor_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(category) if category != ALL_CATEGORIES => expense.category == category,
            _ => true,
        };
        let range_ok = self
            .range
            .as_ref()
            .map_or(true, |range| range.contains_str(&expense.date));
        search_ok && category_ok && range_ok
    }
}

pub struct QueryService;

impl QueryService {
    pub fn filter<'a>(expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
        expenses
            .iter()
            .filter(|expense| filter.matches(expense))
            .collect()
    }

    /// Newest first; expenses with unreadable dates sink to the end.
    pub fn sort_recent(expenses: &mut [Expense]) {
        expenses.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
            (Some(left), Some(right)) => right.cmp(&left),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    /// The `limit` newest expenses.
    pub fn recent(expenses: &[Expense], limit: usize) -> Vec<Expense> {
        let mut sorted = expenses.to_vec();
        Self::sort_recent(&mut sorted);
        sorted.truncate(limit);
        sorted
    }

    /// Distinct category labels in encounter order, for filter pickers.
    pub fn unique_categories(expenses: &[Expense]) -> Vec<String> {
        let mut seen = HashSet::new();
        expenses
            .iter()
            .map(Expense::category_label)
            .filter(|label| seen.insert(*label))
            .map(str::to_string)
            .collect()
    }
}
