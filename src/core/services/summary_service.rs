use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::currency::month_label;
use crate::ledger::{
    period::{month_start, shift_month},
    sum_amounts, Expense, PeriodRange,
};

/// Number of months, current one included, in the trailing trend.
pub const TRAILING_MONTHS: usize = 6;
/// Default length of the top-vendor list.
pub const DEFAULT_TOP_VENDORS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// Short label such as `Oct 26`.
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorTotal {
    pub vendor: String,
    pub total: f64,
    /// Share of the largest vendor total, in percent.
    pub progress: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_amount: f64,
    pub expense_count: usize,
    pub unique_categories: usize,
}

/// One expense row of a monthly statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub date: NaiveDate,
    pub vendor: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatement {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    /// Expenses of the month in date order.
    pub lines: Vec<StatementLine>,
    pub categories: Vec<CategoryTotal>,
}

pub struct SummaryService;

impl SummaryService {
    /// Per-category sums, largest first. Ties keep first-seen order.
    pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for expense in expenses {
            let label = expense.category_label();
            match totals.iter_mut().find(|entry| entry.category == label) {
                Some(entry) => entry.total += expense.amount(),
                None => totals.push(CategoryTotal {
                    category: label.to_string(),
                    total: expense.amount(),
                }),
            }
        }
        totals.sort_by(|a, b| descending(a.total, b.total));
        totals
    }

    pub fn category_totals_for_month(
        expenses: &[Expense],
        year: i32,
        month: u32,
    ) -> Vec<CategoryTotal> {
        Self::category_totals(&Self::in_month(expenses, year, month))
    }

    /// Totals for the six months ending with the month of `today`, oldest
    /// first. Months without spending report zero; later dates are ignored.
    pub fn monthly_trailing(expenses: &[Expense], today: NaiveDate) -> Vec<MonthlyTotal> {
        let current = month_start(today);
        let mut months: Vec<MonthlyTotal> = (0..TRAILING_MONTHS as i32)
            .rev()
            .map(|back| {
                let start = shift_month(current, -back);
                MonthlyTotal {
                    month: format!("{} {:02}", month_label(start.month()), start.year() % 100),
                    year: start.year(),
                    month_number: start.month(),
                    total: 0.0,
                }
            })
            .collect();
        for expense in expenses {
            let Some(date) = expense.parsed_date() else {
                continue;
            };
            if let Some(slot) = months
                .iter_mut()
                .find(|slot| slot.year == date.year() && slot.month_number == date.month())
            {
                slot.total += expense.amount();
            }
        }
        months
    }

    /// Largest vendors by total spend, with each one's share of the leader.
    pub fn top_vendors(expenses: &[Expense], limit: usize) -> Vec<VendorTotal> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for expense in expenses {
            let label = expense.vendor_label();
            match totals.iter_mut().find(|(vendor, _)| vendor.as_str() == label) {
                Some((_, total)) => *total += expense.amount(),
                None => totals.push((label.to_string(), expense.amount())),
            }
        }
        totals.sort_by(|a, b| descending(a.1, b.1));
        totals.truncate(limit);
        let max = totals.first().map(|(_, total)| *total).unwrap_or(0.0);
        totals
            .into_iter()
            .map(|(vendor, total)| VendorTotal {
                progress: if max > 0.0 { total / max * 100.0 } else { 0.0 },
                vendor,
                total,
            })
            .collect()
    }

    pub fn top_vendors_for_month(
        expenses: &[Expense],
        year: i32,
        month: u32,
        limit: usize,
    ) -> Vec<VendorTotal> {
        Self::top_vendors(&Self::in_month(expenses, year, month), limit)
    }

    pub fn dashboard(expenses: &[Expense]) -> DashboardSummary {
        let mut categories: Vec<&str> = expenses.iter().map(Expense::category_label).collect();
        categories.sort_unstable();
        categories.dedup();
        DashboardSummary {
            total_amount: sum_amounts(expenses.iter().map(Expense::amount)),
            expense_count: expenses.len(),
            unique_categories: categories.len(),
        }
    }

    /// Spend per calendar day for every dated expense inside `range`.
    pub fn daily_totals(expenses: &[Expense], range: &PeriodRange) -> BTreeMap<NaiveDate, f64> {
        let mut days = BTreeMap::new();
        for expense in expenses {
            if let Some(date) = expense.parsed_date().filter(|date| range.contains(*date)) {
                *days.entry(date).or_insert(0.0) += expense.amount();
            }
        }
        days
    }

    pub fn expenses_on(expenses: &[Expense], day: NaiveDate) -> Vec<&Expense> {
        expenses
            .iter()
            .filter(|expense| expense.parsed_date() == Some(day))
            .collect()
    }

    /// Every expense of one calendar month with its category breakdown.
    pub fn monthly_statement(expenses: &[Expense], year: i32, month: u32) -> MonthlyStatement {
        let in_month = Self::in_month(expenses, year, month);
        let mut lines: Vec<StatementLine> = in_month
            .iter()
            .filter_map(|expense| {
                expense.parsed_date().map(|date| StatementLine {
                    date,
                    vendor: expense.vendor_label().to_string(),
                    category: expense.category_label().to_string(),
                    amount: expense.amount(),
                })
            })
            .collect();
        lines.sort_by_key(|line| line.date);
        MonthlyStatement {
            year,
            month,
            total: sum_amounts(lines.iter().map(|line| line.amount)),
            categories: Self::category_totals(&in_month),
            lines,
        }
    }

    fn in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<Expense> {
        let Some(range) = PeriodRange::month(year, month) else {
            return Vec::new();
        };
        expenses
            .iter()
            .filter(|expense| range.contains_str(&expense.date))
            .cloned()
            .collect()
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
