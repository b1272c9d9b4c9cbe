use regex::Regex;
use std::sync::LazyLock;

/// First contiguous run of digits and decimal points (`\d` matches any Unicode decimal digit)
static NUMBER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d.]+").unwrap());

/// Extract the first numeric occurrence from free text
///
/// Only the first run is considered. A run that does not parse as a float
/// (`"."`, `"1.2.3"`) yields `None` rather than falling through to a later run.
/// Arabic-Indic, Devanagari and full-width digits read as their ASCII values.
///
/// # Examples
/// ```
/// use car_price_estimator::core::extract_number;
///
/// assert_eq!(extract_number("220 km/h"), Some(220.0));
/// assert_eq!(extract_number("no data"), None);
/// ```
pub fn extract_number(text: &str) -> Option<f64> {
    let run = NUMBER_RUN.find(text)?;
    let ascii: String = run.as_str().chars().map(fold_digit).collect();
    ascii.parse::<f64>().ok()
}

// Zero code point of each non-ASCII digit block; the nine digits follow it
const DIGIT_ZEROS: [u32; 4] = [
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic (Urdu, Persian)
    0x0966, // Devanagari
    0xFF10, // Full-width
];

/// Map a decimal digit from a known script to its ASCII form
fn fold_digit(c: char) -> char {
    let code = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .and_then(|&zero| char::from_digit(code - zero, 10))
        .unwrap_or(c)
}

/// Extract a number from an optional form field; an absent field is missing
#[inline]
pub fn extract_field(value: Option<&str>) -> Option<f64> {
    value.and_then(extract_number)
}

/// Parse a price cell from the reference dataset (`"$1,100,000"`, `"$12,000-$15,000"`)
///
/// Thousands separators are stripped first, then the first number is taken,
/// so ranges resolve to their lower bound.
pub fn parse_price_cell(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    extract_number(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_units() {
        assert_eq!(extract_number("220 km/h"), Some(220.0));
        assert_eq!(extract_number("8.5 sec"), Some(8.5));
        assert_eq!(extract_number("1998 cc"), Some(1998.0));
        assert_eq!(extract_number("240 Nm"), Some(240.0));
    }

    #[test]
    fn test_extract_missing() {
        assert_eq!(extract_number("no data"), None);
        assert_eq!(extract_number("unknown"), None);
        assert_eq!(extract_number(""), None);
    }

    #[test]
    fn test_extract_takes_first_run_only() {
        assert_eq!(extract_number("60 kWh / 400 km"), Some(60.0));
        // Malformed first run does not fall back to the next one
        assert_eq!(extract_number("1.2.3 then 42"), None);
        assert_eq!(extract_number(". 42"), None);
    }

    #[test]
    fn test_extract_non_ascii_digits() {
        assert_eq!(extract_number("\u{06F1}\u{06F5}\u{06F0} hp"), Some(150.0));
        assert_eq!(extract_number("\u{FF11}\u{FF15}\u{FF10} hp"), Some(150.0));
        assert_eq!(extract_number("\u{0668}.\u{0665} sec"), Some(8.5));
        assert_eq!(extract_number("\u{0968}\u{0968}\u{0966} km/h"), Some(220.0));
    }

    #[test]
    fn test_extract_field_absent() {
        assert_eq!(extract_field(None), None);
        assert_eq!(extract_field(Some("150 hp")), Some(150.0));
    }

    #[test]
    fn test_parse_price_cell() {
        assert_eq!(parse_price_cell("$1,100,000"), Some(1_100_000.0));
        assert_eq!(parse_price_cell("$12,000-$15,000"), Some(12_000.0));
        assert_eq!(parse_price_cell("N/A"), None);
    }
}
