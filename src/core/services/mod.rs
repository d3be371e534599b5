pub mod budget_service;
pub mod flow_service;
pub mod goal_service;
pub mod query_service;
pub mod summary_service;

pub use budget_service::{BudgetProgress, BudgetService, BudgetStatus};
pub use flow_service::{FlowGraph, FlowLink, FlowNode, FlowService, Taxonomy};
pub use goal_service::{ContributionKind, GoalProgress, GoalService};
pub use query_service::{ExpenseFilter, QueryService};
pub use summary_service::{
    CategoryTotal, DashboardSummary, MonthlyStatement, MonthlyTotal, SummaryService, VendorTotal,
};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
