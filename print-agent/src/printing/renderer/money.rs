//! Money formatting shared by both renderers

/// Round to the nearest whole currency unit, halves away from zero
pub fn round_amount(amount: f64) -> i64 {
    amount.round() as i64
}

/// Whole-unit money formatter (`$12.345`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    symbol: String,
    thousands_separator: String,
}

impl MoneyFormat {
    pub fn new(symbol: impl Into<String>, thousands_separator: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            thousands_separator: thousands_separator.into(),
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let rounded = round_amount(amount);
        let sign = if rounded < 0 { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            self.symbol,
            group_thousands(rounded.unsigned_abs(), &self.thousands_separator)
        )
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("$", ".")
    }
}

fn group_thousands(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Quantities print with up to two decimals, none when whole
pub fn format_quantity(quantity: f64) -> String {
    let text = format!("{:.2}", quantity);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}
