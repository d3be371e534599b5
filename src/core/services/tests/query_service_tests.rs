use super::{day, expense};
use crate::core::services::query_service::ExpenseFilter;
use crate::core::services::QueryService;
use crate::ledger::PeriodRange;

fn sample() -> Vec<crate::ledger::Expense> {
    vec![
        expense("Corner Market", "Groceries", "2026-10-01", 10.0),
        expense("Blue Cafe", "Dining", "2026-10-05", 8.0),
        expense("Supermarket", "Groceries", "2026-09-20", 40.0),
        expense("Mystery", "Dining", "??", 1.0),
    ]
}

#[test]
fn vendor_search_is_case_insensitive() {
    let expenses = sample();
    let filter = ExpenseFilter::default().with_search("MARKET");
    let found = QueryService::filter(&expenses, &filter);
    assert_eq!(found.len(), 2);
}

#[test]
fn all_category_means_no_filter() {
    let expenses = sample();
    let filter = ExpenseFilter::default().with_category("all");
    assert!(filter.category.is_none());
    assert_eq!(QueryService::filter(&expenses, &filter).len(), 4);
}

#[test]
fn filters_combine() {
    let expenses = sample();
    let filter = ExpenseFilter::default()
        .with_category("Groceries")
        .with_range(PeriodRange::month_of(day(2026, 10, 1)));
    let found = QueryService::filter(&expenses, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vendor_name, "Corner Market");
}

#[test]
fn recent_sorts_newest_first_with_bad_dates_last() {
    let expenses = sample();
    let recent = QueryService::recent(&expenses, 10);
    let vendors: Vec<&str> = recent.iter().map(|e| e.vendor_name.as_str()).collect();
    assert_eq!(
        vendors,
        vec!["Blue Cafe", "Corner Market", "Supermarket", "Mystery"]
    );
    assert_eq!(QueryService::recent(&expenses, 2).len(), 2);
}

#[test]
fn unique_categories_in_encounter_order() {
    let expenses = sample();
    assert_eq!(
        QueryService::unique_categories(&expenses),
        vec!["Groceries".to_string(), "Dining".to_string()]
    );
}
