use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::is_known_category;
use crate::currency::{code_from_symbol, is_iso_code};
use crate::ledger::LineItem;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));
static DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:([^;]+);base64,(.+)$").expect("valid regex"));

/// What the receipt reader reported about one image, after sanitising.
///
/// When `is_receipt` is false every other field is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptExtraction {
    pub is_receipt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
}

impl ReceiptExtraction {
    pub fn not_a_receipt() -> Self {
        Self::default()
    }

    /// Vendor, amount and date are all present and usable.
    pub fn has_essentials(&self) -> bool {
        self.vendor_name.as_deref().is_some_and(|v| !v.trim().is_empty())
            && self.total_amount.is_some_and(|amount| amount != 0.0)
            && self.date.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

/// Parses a model reply into a [`ReceiptExtraction`].
///
/// The reply may wrap the JSON in prose or code fences; the first brace to
/// the last brace is taken. Any failure yields a non-receipt.
pub fn parse_receipt_response(text: &str) -> ReceiptExtraction {
    let Some(block) = JSON_BLOCK.find(text) else {
        warn!("receipt reply contained no JSON object");
        return ReceiptExtraction::not_a_receipt();
    };
    let value: Value = match serde_json::from_str(block.as_str()) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "receipt reply was not valid JSON");
            return ReceiptExtraction::not_a_receipt();
        }
    };
    sanitize(&value)
}

fn sanitize(value: &Value) -> ReceiptExtraction {
    if !truthy(value.get("isReceipt")) {
        return ReceiptExtraction::not_a_receipt();
    }
    ReceiptExtraction {
        is_receipt: true,
        vendor_name: text_field(value, "vendorName"),
        date: text_field(value, "date"),
        time: text_field(value, "time"),
        total_amount: number_field(value, "totalAmount"),
        category: text_field(value, "category").filter(|category| is_known_category(category)),
        taxes: Some(number_field(value, "taxes").unwrap_or(0.0)),
        payment_method: text_field(value, "paymentMethod"),
        subtotal: number_field(value, "subtotal"),
        currency: text_field(value, "currency").and_then(|raw| currency_field(&raw)),
        line_items: value
            .get("lineItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(line_item).collect()),
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".into()),
        _ => None,
    }
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
}

/// Keeps a three-letter code; maps known symbols; drops anything else.
fn currency_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_iso_code(trimmed) {
        return Some(trimmed.to_ascii_uppercase());
    }
    code_from_symbol(trimmed).map(str::to_string)
}

fn line_item(item: &Value) -> LineItem {
    let name = match item.get("name") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    LineItem {
        name,
        quantity: number_field(item, "quantity"),
        amount: number_field(item, "amount").unwrap_or(0.0),
    }
}

/// A decoded `data:<mime>;base64,<payload>` reference. The payload is kept
/// encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub payload: String,
}

pub fn parse_data_uri(raw: &str) -> Option<DataUri> {
    let captures = DATA_URI.captures(raw.trim())?;
    Some(DataUri {
        mime_type: captures.get(1)?.as_str().to_string(),
        payload: captures.get(2)?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_reply_is_sanitised() {
        let reply = r#"Here you go:
```json
{"isReceipt": true, "vendorName": "Corner Market", "date": "2026-10-02",
 "totalAmount": 12.5, "category": "Groceries", "currency": "$",
 "lineItems": [{"name": "Milk", "amount": "oops"}, {"name": "Promo", "amount": -1.5}]}
```"#;
        let extraction = parse_receipt_response(reply);
        assert!(extraction.is_receipt);
        assert_eq!(extraction.vendor_name.as_deref(), Some("Corner Market"));
        assert_eq!(extraction.currency.as_deref(), Some("USD"));
        assert_eq!(extraction.taxes, Some(0.0));
        let items = extraction.line_items.unwrap();
        assert_eq!(items[0].amount, 0.0);
        assert_eq!(items[1].amount, -1.5);
    }

    #[test]
    fn non_receipt_drops_every_field() {
        let extraction =
            parse_receipt_response(r#"{"isReceipt": false, "vendorName": "Cat photo"}"#);
        assert_eq!(extraction, ReceiptExtraction::not_a_receipt());
    }

    #[test]
    fn unknown_category_and_currency_are_discarded() {
        let extraction = parse_receipt_response(
            r#"{"isReceipt": true, "category": "Spaceships", "currency": "dollars"}"#,
        );
        assert!(extraction.category.is_none());
        assert!(extraction.currency.is_none());
    }

    #[test]
    fn garbage_degrades_to_non_receipt() {
        assert!(!parse_receipt_response("no json here").is_receipt);
        assert!(!parse_receipt_response("{not: valid}").is_receipt);
    }

    #[test]
    fn data_uri_requires_base64_form() {
        let uri = parse_data_uri("data:image/png;base64,AAAA").unwrap();
        assert_eq!(uri.mime_type, "image/png");
        assert_eq!(uri.payload, "AAAA");
        assert!(parse_data_uri("https://example.com/receipt.png").is_none());
        assert!(parse_data_uri("data:image/png,AAAA").is_none());
    }
}
