use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    amount_or_zero, label_or, period::parse_iso_date, require_date, require_positive, require_text,
    UNCATEGORIZED, UNKNOWN_VENDOR,
};
use crate::{
    currency::{safe_currency_code, CurrencyCode},
    errors::LedgerError,
};

/// One purchased item on a receipt. Discounts appear as negative amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub amount: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            amount,
        }
    }

    /// Manual entry rules: a name and a non-negative amount.
    pub fn validate(&self) -> Result<(), LedgerError> {
        require_text("Item name", &self.name)?;
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(LedgerError::validation("Amount cannot be negative."));
        }
        Ok(())
    }
}

/// A recorded purchase, usually extracted from a receipt photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Expense {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// Amount used by every aggregation; non-finite values count as zero.
    pub fn amount(&self) -> f64 {
        amount_or_zero(self.total_amount)
    }

    pub fn category_label(&self) -> &str {
        label_or(&self.category, UNCATEGORIZED)
    }

    pub fn vendor_label(&self) -> &str {
        label_or(&self.vendor_name, UNKNOWN_VENDOR)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        safe_currency_code(self.currency.as_deref())
    }

    /// Recomputes the total from subtotal and taxes when both are present.
    pub fn reconcile_total(&mut self) {
        if let Some(total) = reconciled_total(self.subtotal, self.taxes) {
            self.total_amount = total;
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        ExpenseDraft::from(self.clone()).validate()
    }
}

fn reconciled_total(subtotal: Option<f64>, taxes: Option<f64>) -> Option<f64> {
    match (subtotal, taxes) {
        (Some(subtotal), Some(taxes)) if subtotal.is_finite() && taxes.is_finite() => {
            Some(((subtotal + taxes) * 100.0).round() / 100.0)
        }
        _ => None,
    }
}

/// Expense form data before the store assigns an id and owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub vendor_name: String,
    pub date: String,
    pub total_amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ExpenseDraft {
    pub fn new(
        vendor_name: impl Into<String>,
        date: impl Into<String>,
        total_amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            date: date.into(),
            total_amount,
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_breakdown(mut self, subtotal: f64, taxes: f64) -> Self {
        self.subtotal = Some(subtotal);
        self.taxes = Some(taxes);
        self.reconcile_total();
        self
    }

    pub fn reconcile_total(&mut self) {
        if let Some(total) = reconciled_total(self.subtotal, self.taxes) {
            self.total_amount = total;
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        require_text("Vendor name", &self.vendor_name)?;
        require_date("Date", &self.date)?;
        require_positive("Total", self.total_amount)?;
        require_text("Category", &self.category)?;
        if let Some(items) = &self.line_items {
            for item in items {
                require_text("Item name", &item.name)?;
            }
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(LedgerError::validation(
                    "Confidence must be between 0 and 1.",
                ));
            }
        }
        Ok(())
    }

    pub fn into_record(self, id: impl Into<String>, user_id: impl Into<String>) -> Expense {
        Expense {
            id: id.into(),
            user_id: user_id.into(),
            vendor_name: self.vendor_name,
            date: self.date,
            total_amount: self.total_amount,
            category: self.category,
            line_items: self.line_items,
            taxes: self.taxes,
            subtotal: self.subtotal,
            currency: self.currency,
            payment_method: self.payment_method,
            time: self.time,
            confidence: self.confidence,
        }
    }
}

impl From<Expense> for ExpenseDraft {
    fn from(expense: Expense) -> Self {
        Self {
            vendor_name: expense.vendor_name,
            date: expense.date,
            total_amount: expense.total_amount,
            category: expense.category,
            line_items: expense.line_items,
            taxes: expense.taxes,
            subtotal: expense.subtotal,
            currency: expense.currency,
            payment_method: expense.payment_method,
            time: expense.time,
            confidence: expense.confidence,
        }
    }
}

/// Partial-field replacement for a stored expense.
///
/// When the patch touches `subtotal` or `taxes` the total is recomputed from
/// the patched pair, mirroring the entry form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ExpensePatch {
    pub fn apply(&self, expense: &mut Expense) {
        if let Some(value) = &self.vendor_name {
            expense.vendor_name = value.clone();
        }
        if let Some(value) = &self.date {
            expense.date = value.clone();
        }
        if let Some(value) = self.total_amount {
            expense.total_amount = value;
        }
        if let Some(value) = &self.category {
            expense.category = value.clone();
        }
        if let Some(value) = &self.line_items {
            expense.line_items = Some(value.clone());
        }
        if let Some(value) = self.taxes {
            expense.taxes = Some(value);
        }
        if let Some(value) = self.subtotal {
            expense.subtotal = Some(value);
        }
        if let Some(value) = &self.currency {
            expense.currency = Some(value.clone());
        }
        if let Some(value) = &self.payment_method {
            expense.payment_method = Some(value.clone());
        }
        if let Some(value) = &self.time {
            expense.time = Some(value.clone());
        }
        if let Some(value) = self.confidence {
            expense.confidence = Some(value);
        }
        if self.taxes.is_some() || self.subtotal.is_some() {
            expense.reconcile_total();
        }
    }
}
