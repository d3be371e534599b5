#![doc(test(attr(deny(warnings))))]

//! Finance Core turns a user's ledger snapshot (expenses, income, budgets and
//! savings goals) into the aggregates a personal-finance dashboard renders:
//! budget pacing, Sankey-style flow graphs and spending rollups.
//!
//! The services under [`core::services`] are pure functions over snapshots.
//! Stores, receipt extraction contracts and the report shell live around them.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod extraction;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
