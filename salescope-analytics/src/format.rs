//! Presentation helpers: rounding and display strings

/// Round to 2 decimal places
///
/// Only applied when presenting values; sums keep full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ratio that is 0 when the denominator is 0
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole) * 100.0
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an integer count with thousands separators, e.g. `12,345`
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format a percentage with 2 decimals, e.g. `66.67%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Currency display settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// Prefix placed before the amount, including any spacing
    pub prefix: String,
}

impl CurrencyFormat {
    /// Create a format with a custom prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Format an amount with 2 decimals and thousands separators
    pub fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!(
            "{}{}{}.{}",
            sign,
            self.prefix,
            group_thousands(int_part),
            frac_part
        )
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("R$ ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(60.0), 60.0);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_zero_denominators() {
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_counts_and_percent() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_percent(66.666), "66.67%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_currency() {
        let brl = CurrencyFormat::default();
        assert_eq!(brl.format(0.0), "R$ 0.00");
        assert_eq!(brl.format(1234.5), "R$ 1,234.50");
        assert_eq!(brl.format(1_000_000.126), "R$ 1,000,000.13");
        assert_eq!(brl.format(-12.3), "-R$ 12.30");

        let usd = CurrencyFormat::new("$");
        assert_eq!(usd.format(60.0), "$60.00");
    }
}
