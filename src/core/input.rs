use serde::Deserialize;

use super::types::{ANNUAL_RATE_PERCENT, FALLBACK_PRINCIPAL, GIFT_AMOUNT, ScenarioInput};

/// Values exactly as typed into the calculator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawInput {
    pub current_balance: String,
    pub gift_enabled: bool,
    pub monthly_contribution: String,
}

impl RawInput {
    /// The balance is read from its digits alone, the same text the field is
    /// echoed back as; the contribution keeps its decimals.
    pub fn resolve(&self, current_age: u32) -> ScenarioInput {
        let balance = format_number_with_commas(&self.current_balance);
        let principal =
            usable(parse_number_from_formatted(&balance)).unwrap_or(FALLBACK_PRINCIPAL);
        let monthly_contribution =
            usable(parse_number_from_formatted(&self.monthly_contribution)).unwrap_or(0.0);

        ScenarioInput {
            principal,
            gift_amount: if self.gift_enabled { GIFT_AMOUNT } else { 0.0 },
            monthly_contribution,
            annual_rate_percent: ANNUAL_RATE_PERCENT,
            current_age,
        }
    }
}

fn usable(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parses a number that may carry thousands separators; anything unparseable is 0.
pub fn parse_number_from_formatted(text: &str) -> f64 {
    let cleaned = text.trim().replace(',', "");
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Keeps only the digits of `text` and groups them by thousands.
pub fn format_number_with_commas(text: &str) -> String {
    let digits = text.chars().filter(char::is_ascii_digit).collect::<String>();
    group_thousands(&digits)
}

/// Whole-dollar currency text, e.g. `$12,345` or `-$40`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
