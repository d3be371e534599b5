use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::categorize::{parse_categorization_response, CategorizationRequest};
use super::receipt::{parse_data_uri, parse_receipt_response, DataUri, ReceiptExtraction};
use crate::ledger::{ExpenseDraft, LineItem};

/// Transport failure reported by a model client.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Client for the vision model that reads receipt photos.
pub trait ReceiptExtractor: Send + Sync {
    /// Sends the image and returns the model's raw text reply.
    fn extract(&self, image: &DataUri) -> Result<String, ClientError>;
}

/// Client for the text model that assigns a category to an expense.
pub trait ExpenseCategorizer: Send + Sync {
    fn categorize(&self, request: &CategorizationRequest) -> Result<String, ClientError>;
}

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("No receipt image provided.")]
    NoImage,
    #[error("The receipt image is not a base64 data URI.")]
    InvalidImage,
    #[error("The uploaded image does not appear to be a receipt. Please try another image.")]
    NotAReceipt,
    #[error("Failed to extract essential data from the receipt. Please try a clearer image.")]
    MissingFields,
    #[error("An unexpected error occurred while processing the receipt. {0}")]
    Service(String),
}

/// A receipt that passed extraction and categorization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedReceipt {
    pub vendor_name: String,
    pub date: String,
    pub total_amount: f64,
    pub category: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
}

impl ProcessedReceipt {
    /// Form data for the review step. The total is recomputed from subtotal
    /// and taxes when both were read.
    pub fn into_draft(self) -> ExpenseDraft {
        let mut draft = ExpenseDraft::new(
            self.vendor_name,
            self.date,
            self.total_amount,
            self.category,
        );
        draft.time = self.time;
        draft.taxes = self.taxes;
        draft.subtotal = self.subtotal;
        draft.payment_method = self.payment_method;
        draft.currency = self.currency;
        draft.line_items = self.line_items;
        draft.confidence = Some(self.confidence);
        draft.reconcile_total();
        draft
    }
}

/// Photo in, categorized expense draft out.
pub struct ReceiptPipeline<E, C> {
    extractor: E,
    categorizer: C,
}

impl<E, C> ReceiptPipeline<E, C>
where
    E: ReceiptExtractor,
    C: ExpenseCategorizer,
{
    pub fn new(extractor: E, categorizer: C) -> Self {
        Self {
            extractor,
            categorizer,
        }
    }

    pub fn process(&self, data_uri: &str) -> Result<ProcessedReceipt, ReceiptError> {
        if data_uri.trim().is_empty() {
            return Err(ReceiptError::NoImage);
        }
        let image = parse_data_uri(data_uri).ok_or(ReceiptError::InvalidImage)?;

        let reply = self
            .extractor
            .extract(&image)
            .map_err(|err| ReceiptError::Service(err.to_string()))?;
        let extraction = parse_receipt_response(&reply);
        if !extraction.is_receipt {
            return Err(ReceiptError::NotAReceipt);
        }
        if !extraction.has_essentials() {
            warn!("receipt extraction is missing vendor, total or date");
            return Err(ReceiptError::MissingFields);
        }

        let request = categorization_request(&extraction);
        let reply = self
            .categorizer
            .categorize(&request)
            .map_err(|err| ReceiptError::Service(err.to_string()))?;
        let categorization = parse_categorization_response(&reply);
        info!(
            vendor = %request.vendor,
            category = %categorization.category,
            "processed receipt"
        );

        Ok(ProcessedReceipt {
            vendor_name: request.vendor,
            date: request.date,
            total_amount: request.amount,
            category: categorization.category,
            confidence: categorization.confidence,
            time: extraction.time,
            taxes: extraction.taxes,
            subtotal: extraction.subtotal,
            payment_method: extraction.payment_method,
            currency: extraction.currency,
            line_items: extraction.line_items,
        })
    }
}

/// Describes the purchase as the vendor followed by its item names.
fn categorization_request(extraction: &ReceiptExtraction) -> CategorizationRequest {
    let vendor = extraction.vendor_name.clone().unwrap_or_default();
    let items = extraction
        .line_items
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|item| item.name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    CategorizationRequest {
        description: format!("{vendor} {items}").trim().to_string(),
        vendor,
        amount: extraction.total_amount.unwrap_or_default(),
        date: extraction.date.clone().unwrap_or_default(),
    }
}
