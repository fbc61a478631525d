//! Formatting helpers shared by logging and alert rendering

use num_format::{Locale, ToFormattedString};

/// Formats an amount with thousands separators and two decimals, e.g. `1,234,567.89`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, whole.to_formatted_string(&Locale::en), fraction)
}

/// Formats an optional percentage, falling back to `N/A`.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567.891), "1,234,567.89");
        assert_eq!(format_thousands(999.5), "999.50");
        assert_eq!(format_thousands(0.0), "0.00");
        assert_eq!(format_thousands(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(-2.5), 2), "-2.50");
        assert_eq!(format_optional(Some(1.23456), 2), "1.23");
        assert_eq!(format_optional(None, 2), "N/A");
    }
}
