//! Display formatting shared by table cells, record cards, and messages.

use chrono::NaiveDate;

/// Thousands-separated rendering with up to three fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let rounded = format!("{:.3}", value.abs());
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (trimmed, None),
    };

    let mut out = String::new();
    if negative && trimmed != "0" {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Compact currency: `$1.2M` from a million up, `$500K` from a thousand up,
/// grouped whole dollars below that.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${}", format_number(value.round()))
    }
}

/// Short cell form: `Jan 5, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Long form used when a message names a date bound: `January 5, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse the date shapes the wire actually carries: bare `YYYY-MM-DD` or an
/// ISO timestamp starting with one.
pub fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Cell-friendly date rendering, falling back to the raw text when the
/// value does not parse.
pub fn format_date_value(value: &str) -> String {
    match parse_wire_date(value) {
        Some(date) => format_date(date),
        None => value.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(-45_000.0), "-45,000");
    }

    #[test]
    fn test_format_number_fractions() {
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(3.1419), "3.142");
        assert_eq!(format_number(1200.50), "1,200.5");
    }

    #[test]
    fn test_format_currency_tiers() {
        assert_eq!(format_currency(2_500_000.0), "$2.5M");
        assert_eq!(format_currency(1_000_000.0), "$1.0M");
        assert_eq!(format_currency(45_000.0), "$45K");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(0.0), "$0");
    }

    #[test]
    fn test_format_date_forms() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
        assert_eq!(format_long_date(date), "January 5, 2024");
    }

    #[test]
    fn test_parse_wire_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        assert_eq!(parse_wire_date("2023-11-02"), Some(expected));
        assert_eq!(parse_wire_date("2023-11-02T00:00:00Z"), Some(expected));
        assert_eq!(parse_wire_date("2023-11-02T14:30:00"), Some(expected));
        assert_eq!(parse_wire_date("not a date"), None);
        assert_eq!(parse_wire_date(""), None);
    }

    #[test]
    fn test_format_date_value_fallback() {
        assert_eq!(format_date_value("2024-03-18"), "Mar 18, 2024");
        assert_eq!(format_date_value("pending"), "pending");
    }
}
