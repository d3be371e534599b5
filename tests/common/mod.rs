#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use finance_core::{
    config::ConfigManager,
    ledger::{
        Budget, BudgetDraft, BudgetPeriod, Expense, ExpenseDraft, Income, IncomeDraft,
        SavingsGoal, SavingsGoalDraft,
    },
    storage::{json_backend::save_data_to_path, StoreData},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

pub const USER: &str = "user-1";

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory and a config manager rooted in it.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn expense(vendor: &str, category: &str, date: &str, amount: f64) -> Expense {
    ExpenseDraft::new(vendor, date, amount, category)
        .into_record(format!("{vendor}-{date}-{amount}"), USER)
}

pub fn income(source: &str, date: &str, amount: f64) -> Income {
    IncomeDraft::new(source, date, amount).into_record(format!("{source}-{date}"), USER)
}

pub fn budget(name: &str, category: &str, amount: f64, period: BudgetPeriod) -> Budget {
    BudgetDraft::new(name, category, amount, period).into_record(format!("budget-{name}"), USER)
}

pub fn goal(name: &str, target: f64, current: f64, deadline: Option<&str>) -> SavingsGoal {
    SavingsGoalDraft {
        name: name.into(),
        target_amount: target,
        current_amount: current,
        deadline: deadline.map(str::to_string),
    }
    .into_record(format!("goal-{name}"), USER)
}

/// A small October 2026 ledger shared by the shell and property tests.
pub fn sample_store() -> StoreData {
    StoreData {
        expenses: vec![
            expense("Corner Market", "Groceries", "2026-10-03", 120.0),
            expense("Corner Market", "Groceries", "2026-10-11", 80.0),
            expense("Bistro 9", "Dining", "2026-10-05", 45.5),
            expense("City Power", "Utilities", "2026-10-01", 90.0),
            expense("Bookshop", "Hobbies", "2026-09-20", 30.0),
        ],
        incomes: vec![income("Salary", "2026-10-01", 1500.0)],
        budgets: vec![budget("Food", "Groceries", 250.0, BudgetPeriod::Monthly)],
        savings_goals: vec![goal("Trip", 1000.0, 250.0, Some("2026-12-31"))],
    }
}

pub fn write_store(dir: &Path, data: &StoreData) -> PathBuf {
    let path = dir.join("store.json");
    save_data_to_path(data, &path).expect("write store");
    path
}
