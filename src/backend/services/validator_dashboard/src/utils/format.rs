pub const DEFAULT_MAX_FRACTION_DIGITS: usize = 2;
const MIN_FRACTION_DIGITS: usize = 2;

/// Format a number the way the dashboard shows amounts: en-US digit
/// grouping, at least two fraction digits and at most `max_fraction_digits`.
/// Missing or non-finite values render as zero.
pub fn format_local_currency(value: Option<f64>, max_fraction_digits: usize) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let min_digits = MIN_FRACTION_DIGITS.min(max_fraction_digits);

    let rounded = format!("{:.*}", max_fraction_digits, value.abs());
    let (integer, fraction) = match rounded.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
        None => (rounded.clone(), String::new()),
    };

    let mut fraction = fraction;
    while fraction.len() > min_digits && fraction.ends_with('0') {
        fraction.pop();
    }

    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("{}{}", sign, group_thousands(&integer))
    } else {
        format!("{}{}.{}", sign, group_thousands(&integer), fraction)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Percentage with two decimals, or the placeholder when absent.
pub fn format_percentage(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v),
        None => "---%".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_thousands() {
        assert_eq!(format_local_currency(Some(1234567.891), 2), "1,234,567.89");
        assert_eq!(format_local_currency(Some(999.0), 2), "999.00");
    }

    #[test]
    fn test_trims_to_minimum_fraction() {
        assert_eq!(format_local_currency(Some(32.5), 4), "32.50");
        assert_eq!(format_local_currency(Some(0.12345), 4), "0.1235");
    }

    #[test]
    fn test_missing_value_is_zero() {
        assert_eq!(format_local_currency(None, 2), "0.00");
        assert_eq!(format_local_currency(Some(f64::NAN), 3), "0.00");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_local_currency(Some(-1500.0), 2), "-1,500.00");
        assert_eq!(format_local_currency(Some(-0.001), 2), "0.00");
    }

    #[test]
    fn test_percentage_placeholder() {
        assert_eq!(format_percentage(Some(4.3)), "4.30%");
        assert_eq!(format_percentage(None), "---%");
    }
}
