use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finance_core::core::services::{BudgetService, FlowService, SummaryService, Taxonomy};
use finance_core::ledger::{BudgetDraft, BudgetPeriod, ExpenseDraft, IncomeDraft, Ledger};
use finance_core::storage::{
    json_backend::{load_data_from_path, save_data_to_path},
    StoreData,
};
use tempfile::tempdir;

const CATEGORIES: [&str; 8] = [
    "Groceries",
    "Dining",
    "Housing",
    "Transportation",
    "Shopping",
    "Savings",
    "Hobbies",
    "",
];

fn build_sample_ledger(expense_count: usize) -> Ledger {
    let mut ledger = Ledger::new("bench");
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    for idx in 0..expense_count {
        let date = start + Duration::days((idx % 300) as i64);
        let category = CATEGORIES[idx % CATEGORIES.len()];
        ledger.expenses.push(
            ExpenseDraft::new(
                format!("Vendor {}", idx % 40),
                date.to_string(),
                5.0 + (idx % 90) as f64,
                category,
            )
            .into_record(format!("e{idx}"), "bench"),
        );
    }
    for month in 1..=10 {
        let date = NaiveDate::from_ymd_opt(2026, month, 1).unwrap();
        ledger.incomes.push(
            IncomeDraft::new("Salary", date.to_string(), 4200.0)
                .into_record(format!("i{month}"), "bench"),
        );
    }
    for (idx, category) in CATEGORIES.iter().take(6).enumerate() {
        ledger.budgets.push(
            BudgetDraft::new(*category, *category, 400.0, BudgetPeriod::Monthly)
                .into_record(format!("b{idx}"), "bench"),
        );
    }
    ledger
}

fn bench_flow_graph(c: &mut Criterion) {
    let ledger = build_sample_ledger(10_000);
    let taxonomy = Taxonomy::default();

    c.bench_function("flow_graph_10k", |b| {
        b.iter(|| {
            let graph = FlowService::build(
                black_box(&ledger.incomes),
                black_box(&ledger.expenses),
                &taxonomy,
            );
            black_box(graph);
        })
    });
}

fn bench_rollups(c: &mut Criterion) {
    let ledger = build_sample_ledger(10_000);
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    c.bench_function("category_totals_10k", |b| {
        b.iter(|| black_box(SummaryService::category_totals(black_box(&ledger.expenses))))
    });
    c.bench_function("monthly_trailing_10k", |b| {
        b.iter(|| black_box(SummaryService::monthly_trailing(&ledger.expenses, today)))
    });
    c.bench_function("top_vendors_10k", |b| {
        b.iter(|| black_box(SummaryService::top_vendors(&ledger.expenses, 5)))
    });
    c.bench_function("budget_pacing_10k", |b| {
        b.iter(|| black_box(BudgetService::evaluate_ledger(&ledger, today)))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(10_000);
    let data = StoreData {
        expenses: ledger.expenses,
        incomes: ledger.incomes,
        budgets: ledger.budgets,
        savings_goals: ledger.savings_goals,
    };
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ledger.json");

    c.bench_function("snapshot_save_10k", |b| {
        b.iter(|| save_data_to_path(&data, &path).expect("save snapshot"))
    });

    save_data_to_path(&data, &path).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| black_box(load_data_from_path(&path).expect("load snapshot")))
    });
}

criterion_group!(benches, bench_flow_graph, bench_rollups, bench_snapshot_io);
criterion_main!(benches);
