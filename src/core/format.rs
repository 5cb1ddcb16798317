//! Metric formatting.
//!
//! Currency renders with a `$` prefix, thousands separators and two decimals;
//! percentages with one decimal and a trailing `%`; counts with thousands
//! separators. The `round_*` helpers expose the same rounding as numbers so
//! callers can compare values the way they will be displayed.

/// Rounds to cents.
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place.
#[must_use]
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Inserts a comma between every group of three digits.
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats a dollar amount, e.g. `$1,234.50` or `-$5.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let rounded = round_currency(amount);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{cents}", group_digits(whole))
}

/// Formats a percentage with one decimal, e.g. `80.0%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", round_percent(value))
}

/// Formats a growth figure with an explicit sign, e.g. `+12.5%` or `-3.0%`.
#[must_use]
pub fn format_change(value: f64) -> String {
    let rounded = round_percent(value);
    if rounded < 0.0 {
        format!("-{:.1}%", rounded.abs())
    } else {
        format!("+{rounded:.1}%")
    }
}

/// Formats a count with thousands separators, e.g. `12,345`.
#[must_use]
pub fn format_count(count: i64) -> String {
    let grouped = group_digits(&count.unsigned_abs().to_string());
    if count < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(10.004), 10.0);
        assert_eq!(round_currency(2.675_1), 2.68);
        assert_eq!(round_currency(-1.236), -1.24);
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(79.96), 80.0);
        assert_eq!(round_percent(12.34), 12.3);
        assert_eq!(round_percent(-3.06), -3.1);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(15.0), "$15.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_format_currency_tiny_negative_is_zero() {
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(80.0), "80.0%");
        assert_eq!(format_percent(33.333), "33.3%");
        assert_eq!(format_percent(-12.56), "-12.6%");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(12.5), "+12.5%");
        assert_eq!(format_change(0.0), "+0.0%");
        assert_eq!(format_change(-3.0), "-3.0%");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(-4500), "-4,500");
    }
}
