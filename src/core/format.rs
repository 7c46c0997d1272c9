use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Parse a French-order (day/month/year) source date.
///
/// Accepts `DD/MM/YYYY`, `DD-MM-YYYY`, and already-normalized
/// `YYYY-MM-DD`. Extraction upstream only guarantees day/month/year
/// ordering, so ambiguous inputs are resolved day-first.
pub fn parse_fr_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%m-%Y"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Serialize a date as the CII 8-digit form (`YYYYMMDD`, format code 102).
pub fn format_cii_date(date: &NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Format a monetary amount with exactly two decimal digits.
pub fn format_amount(d: Decimal) -> String {
    format!("{:.2}", d.round_dp_with_strategy(
        2,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    ))
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// ISO 4217 codes the pipeline recognizes. French invoicing is
/// EUR-denominated in practice; the rest covers common export currencies.
const KNOWN_CURRENCIES: &[&str] = &[
    "EUR", "USD", "GBP", "CHF", "CAD", "JPY", "AUD", "SEK", "NOK", "DKK", "PLN", "CZK", "HUF",
    "RON", "BGN", "HRK", "CNY", "HKD", "SGD", "NZD", "MXN", "BRL", "ZAR", "TND", "MAD", "XOF",
    "XPF", "AED", "INR", "KRW",
];

/// Check whether a currency code is a known ISO 4217 code.
pub fn is_known_currency_code(code: &str) -> bool {
    KNOWN_CURRENCIES.contains(&code)
}
