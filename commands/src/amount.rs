/// Parses an amount typed in chat.
///
/// Both Brazilian (`1.200,50`) and English (`1,200.50`) grouping are accepted.
/// When both separators appear the last one marks the decimals. A lone
/// separator that appears once is decimal; repeated, it groups thousands.
/// Returns `None` for malformed, zero or negative amounts.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let last_dot = text.rfind('.');
    let last_comma = text.rfind(',');

    let canonical = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            text.replace(grouping, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(text, '.'),
        (None, Some(_)) => single_separator(text, ','),
        (None, None) => text.to_string(),
    };

    if canonical.matches('.').count() > 1 || canonical.ends_with('.') {
        return None;
    }

    let value: f64 = canonical.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    // fractions of a cent round to zero and are rejected like zero
    let value = (value * 100.0).round() / 100.0;
    if value <= 0.0 {
        return None;
    }

    Some(value)
}

fn single_separator(text: &str, separator: char) -> String {
    if text.matches(separator).count() == 1 {
        text.replace(separator, ".")
    } else {
        text.replace(separator, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_decimal() {
        assert_eq!(parse_amount("12"), Some(12.0));
        assert_eq!(parse_amount("15,50"), Some(15.5));
        assert_eq!(parse_amount("15.50"), Some(15.5));
        assert_eq!(parse_amount("12,5"), Some(12.5));
    }

    #[test]
    fn test_grouping() {
        assert_eq!(parse_amount("1.200,50"), Some(1200.5));
        assert_eq!(parse_amount("1,200.50"), Some(1200.5));
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000.0));
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(parse_amount("10,556"), Some(10.56));
    }

    #[test]
    fn test_rejects_invalid() {
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("0,00"), None);
        assert_eq!(parse_amount("0,004"), None);
        assert_eq!(parse_amount("0,005"), Some(0.01));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12,"), None);
        assert_eq!(parse_amount(",5"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount(""), None);
    }
}
