mod budget_service_tests;
mod flow_service_tests;
mod query_service_tests;

use chrono::NaiveDate;

use crate::ledger::{Expense, ExpenseDraft, Income, IncomeDraft};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn expense(vendor: &str, category: &str, date: &str, amount: f64) -> Expense {
    ExpenseDraft::new(vendor, date, amount, category).into_record(format!("e-{vendor}-{date}"), "u1")
}

fn income(source: &str, date: &str, amount: f64) -> Income {
    IncomeDraft::new(source, date, amount).into_record(format!("i-{source}-{date}"), "u1")
}
