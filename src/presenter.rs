//! Currency rendering of predictions

use crate::types::Prediction;

/// Peso sign, the currency of the survey data.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

/// Formats amounts as `<symbol><thousands-separated integer>.<2 decimals>`.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbol: String,
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        // "-0.00" is not a useful amount
        let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            "-"
        } else {
            ""
        };
        format!("{}{}{}.{}", sign, self.symbol, grouped, cents)
    }

    /// One-line result message for a prediction.
    pub fn render(&self, target_label: &str, prediction: Prediction) -> String {
        format!(
            "Predicted {}: {}",
            target_label,
            self.format(prediction.value())
        )
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}
