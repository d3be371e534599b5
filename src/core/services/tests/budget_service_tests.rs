use super::{day, expense};
use crate::core::services::{BudgetService, BudgetStatus};
use crate::ledger::{BudgetDraft, BudgetPeriod, Ledger};

#[test]
fn pacing_alert_fires_when_spending_outruns_the_month() {
    let budget = BudgetDraft::new("Food", "Groceries", 100.0, BudgetPeriod::Monthly)
        .into_record("b1", "u1");
    let expenses = vec![expense("Market", "Groceries", "2026-09-03", 50.0)];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 9, 10));

    assert_eq!(progress.spent, 50.0);
    assert!((progress.elapsed_ratio - 10.0 / 30.0).abs() < 1e-9);
    assert!(progress.pacing_alert);
    assert_eq!(progress.status, BudgetStatus::Pacing);
    assert_eq!(progress.remaining, 50.0);
}

#[test]
fn exhausted_budget_does_not_raise_pacing_alert() {
    let budget = BudgetDraft::new("Food", "Groceries", 100.0, BudgetPeriod::Monthly)
        .into_record("b1", "u1");
    let expenses = vec![expense("Market", "Groceries", "2026-09-03", 100.0)];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 9, 10));

    assert!(!progress.pacing_alert);
    assert_eq!(progress.status, BudgetStatus::Exhausted);
    assert_eq!(progress.progress, 100.0);
}

#[test]
fn overspending_reports_progress_above_hundred() {
    let budget = BudgetDraft::new("Fun", "Entertainment", 40.0, BudgetPeriod::Weekly)
        .into_record("b1", "u1");
    let expenses = vec![
        expense("Cinema", "Entertainment", "2026-10-12", 30.0),
        expense("Arcade", "Entertainment", "2026-10-14", 30.0),
    ];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 10, 15));

    assert_eq!(progress.progress, 150.0);
    assert_eq!(progress.display_progress(), 100.0);
    assert!(progress.is_over_budget());
}

#[test]
fn only_matching_category_inside_period_counts() {
    let budget = BudgetDraft::new("Food", "Groceries", 300.0, BudgetPeriod::Monthly)
        .into_record("b1", "u1");
    let expenses = vec![
        expense("Market", "Groceries", "2026-10-02", 20.0),
        expense("Market", "Groceries", "2026-09-30", 99.0),
        expense("Cafe", "Dining", "2026-10-03", 15.0),
        expense("Market", "Groceries", "not-a-date", 40.0),
    ];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 10, 18));

    assert_eq!(progress.spent, 20.0);
    assert_eq!(progress.status, BudgetStatus::OnTrack);
}

#[test]
fn zero_amount_budget_is_invalid_without_nan() {
    let mut budget = BudgetDraft::new("Broken", "Groceries", 10.0, BudgetPeriod::Yearly)
        .into_record("b1", "u1");
    budget.amount = 0.0;
    let expenses = vec![expense("Market", "Groceries", "2026-03-01", 20.0)];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 10, 18));

    assert_eq!(progress.status, BudgetStatus::Invalid);
    assert_eq!(progress.progress, 0.0);
    assert_eq!(progress.spent_ratio, 0.0);
    assert!(!progress.pacing_alert);
    assert!(progress.progress.is_finite());

    let idle = BudgetService::evaluate(&budget, &[], day(2026, 10, 18));
    assert!(idle.remaining.is_sign_positive());
}

#[test]
fn evaluate_all_keeps_input_order_and_alerts_filter() {
    let budgets = vec![
        BudgetDraft::new("A", "Groceries", 100.0, BudgetPeriod::Monthly).into_record("a", "u1"),
        BudgetDraft::new("B", "Dining", 100.0, BudgetPeriod::Monthly).into_record("b", "u1"),
    ];
    let expenses = vec![expense("Cafe", "Dining", "2026-10-01", 90.0)];

    let progress = BudgetService::evaluate_all(&budgets, &expenses, day(2026, 10, 5));

    assert_eq!(progress[0].budget_id, "a");
    assert_eq!(progress[1].budget_id, "b");
    let alerts = BudgetService::alerts(&progress);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].budget_id, "b");
}

#[test]
fn padded_category_still_counts_toward_budget() {
    let budget = BudgetDraft::new("Eating out", "Dining", 50.0, BudgetPeriod::Monthly)
        .into_record("b1", "u1");
    let expenses = vec![expense("Cafe", "Dining ", "2026-10-03", 40.0)];

    let progress = BudgetService::evaluate(&budget, &expenses, day(2026, 10, 18));
    assert_eq!(progress.spent, 40.0);
    assert!(budget.tracks(" Dining"));

    let mut ledger = Ledger::new("u1");
    ledger.expenses = expenses;
    ledger.budgets.push(budget);
    assert!(ledger.orphaned_budgets().is_empty());
}

#[test]
fn untouched_budget_reports_positive_zero() {
    let budget = BudgetDraft::new("Fun", "Leisure", 80.0, BudgetPeriod::Monthly)
        .into_record("b1", "u1");

    let progress = BudgetService::evaluate(&budget, &[], day(2026, 10, 18));

    assert!(progress.spent.is_sign_positive());
    assert!(progress.progress.is_sign_positive());
    assert_eq!(format!("{:.0}%", progress.progress), "0%");
    let json = serde_json::to_string(&progress).unwrap();
    assert!(!json.contains("-0.0"));
}
