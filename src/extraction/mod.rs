//! Contracts for the external receipt-reading and categorization models, the
//! sanitising of their free-text replies, and the pipeline that turns a photo
//! into an expense draft.

pub mod categorize;
pub mod pipeline;
pub mod receipt;

pub use categorize::{parse_categorization_response, Categorization, CategorizationRequest};
pub use pipeline::{
    ExpenseCategorizer, ProcessedReceipt, ReceiptError, ReceiptExtractor, ReceiptPipeline,
};
pub use receipt::{parse_data_uri, parse_receipt_response, DataUri, ReceiptExtraction};

/// Categories the receipt reader may assign. Anything else is discarded.
pub const EXPENSE_CATEGORIES: [&str; 15] = [
    "Groceries",
    "Food & Drink",
    "Dining",
    "Transportation",
    "Travel",
    "Shopping",
    "Entertainment",
    "Utilities",
    "Housing",
    "Health",
    "Insurance",
    "Personal Care",
    "Gifts",
    "Subscriptions",
    "Other",
];

pub fn is_known_category(candidate: &str) -> bool {
    EXPENSE_CATEGORIES.contains(&candidate)
}
