use finance_core::currency::{
    format_amount, format_currency_value, safe_currency_code, CurrencyCode, CurrencyDisplay,
    FormatOptions, LocaleConfig, NegativeStyle,
};
use finance_core::ledger::ExpenseDraft;

#[test]
fn formats_currency_with_locale() {
    let mut locale = LocaleConfig::default();
    locale.decimal_separator = ',';
    locale.grouping_separator = '.';
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Code,
        negative_style: NegativeStyle::Sign,
    };
    let formatted = format_currency_value(-1234.5, &CurrencyCode::new("eur"), &locale, &options);
    assert_eq!(formatted, "EUR -1.234,50");
}

#[test]
fn expense_currency_falls_back_to_usd() {
    let mut draft = ExpenseDraft::new("Cafe", "2026-10-02", 4.5, "Dining");
    draft.currency = Some("£".into());
    let expense = draft.clone().into_record("e1", "u1");
    assert_eq!(expense.currency_code().as_str(), "GBP");

    draft.currency = None;
    let expense = draft.into_record("e2", "u1");
    assert_eq!(expense.currency_code().as_str(), "USD");
    assert_eq!(format_amount(expense.amount(), None), "$4.50");
}

#[test]
fn garbage_codes_never_reach_formatting() {
    assert_eq!(safe_currency_code(Some("12")).as_str(), "USD");
    assert_eq!(safe_currency_code(Some(" chf ")).as_str(), "CHF");
}
