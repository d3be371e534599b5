use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    amount_or_zero, label_or, period::parse_iso_date, require_date, require_positive, require_text,
    OTHER_INCOME,
};
use crate::errors::LedgerError;

/// Money received from a named source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Income {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    pub fn amount(&self) -> f64 {
        amount_or_zero(self.amount)
    }

    pub fn source_label(&self) -> &str {
        label_or(&self.source_name, OTHER_INCOME)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        IncomeDraft::from(self.clone()).validate()
    }
}

/// Income form data before the store assigns an id and owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeDraft {
    pub source_name: String,
    pub date: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IncomeDraft {
    pub fn new(source_name: impl Into<String>, date: impl Into<String>, amount: f64) -> Self {
        Self {
            source_name: source_name.into(),
            date: date.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        require_text("Source name", &self.source_name)?;
        require_date("Date", &self.date)?;
        require_positive("Amount", self.amount)
    }

    pub fn into_record(self, id: impl Into<String>, user_id: impl Into<String>) -> Income {
        Income {
            id: id.into(),
            user_id: user_id.into(),
            source_name: self.source_name,
            date: self.date,
            amount: self.amount,
            currency: self.currency,
            note: self.note,
        }
    }
}

impl From<Income> for IncomeDraft {
    fn from(income: Income) -> Self {
        Self {
            source_name: income.source_name,
            date: income.date,
            amount: income.amount,
            currency: income.currency,
            note: income.note,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IncomePatch {
    pub fn apply(&self, income: &mut Income) {
        if let Some(value) = &self.source_name {
            income.source_name = value.clone();
        }
        if let Some(value) = &self.date {
            income.date = value.clone();
        }
        if let Some(value) = self.amount {
            income.amount = value;
        }
        if let Some(value) = &self.currency {
            income.currency = Some(value.clone());
        }
        if let Some(value) = &self.note {
            income.note = Some(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_source_groups_under_other_income() {
        let income = IncomeDraft::new("", "2026-10-01", 10.0).into_record("i1", "u1");
        assert_eq!(income.source_label(), OTHER_INCOME);
        assert!(income.validate().is_err());
    }

    #[test]
    fn patch_replaces_only_given_fields() {
        let mut income = IncomeDraft::new("Salary", "2026-10-01", 3000.0).into_record("i1", "u1");
        IncomePatch {
            amount: Some(3100.0),
            ..IncomePatch::default()
        }
        .apply(&mut income);
        assert_eq!(income.amount, 3100.0);
        assert_eq!(income.source_name, "Salary");
    }
}
