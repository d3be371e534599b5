use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::ledger::UNCATEGORIZED;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));

/// What the categorizer is told about an expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorizationRequest {
    pub description: String,
    pub vendor: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    pub category: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
}

impl Categorization {
    pub fn uncategorized() -> Self {
        Self {
            category: UNCATEGORIZED.to_string(),
            confidence: 0.0,
        }
    }
}

/// Reads `{"category": ..., "confidence": ...}` out of a model reply.
/// A missing or blank category degrades to `Uncategorized` with zero confidence.
pub fn parse_categorization_response(text: &str) -> Categorization {
    let parsed = JSON_BLOCK
        .find(text)
        .and_then(|block| serde_json::from_str::<Value>(block.as_str()).ok());
    let Some(value) = parsed else {
        warn!("categorization reply was not a JSON object");
        return Categorization::uncategorized();
    };
    let category = value
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|category| !category.is_empty());
    match category {
        Some(category) => Categorization {
            category: category.to_string(),
            confidence: value
                .get("confidence")
                .and_then(Value::as_f64)
                .filter(|confidence| confidence.is_finite())
                .map_or(0.0, |confidence| confidence.clamp(0.0, 1.0)),
        },
        None => {
            warn!("categorization reply had no category");
            Categorization::uncategorized()
        }
    }
}
