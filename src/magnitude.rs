//! Locale-aware magnitude numerals.
//!
//! Korean platforms abbreviate large counts with scale markers: "13.7만"
//! (13.7 × 10⁴), "1.2억" (1.2 × 10⁸), "5천" (5 × 10³). English pages use
//! "1.2K"/"3M". This module turns such strings into integers.

use crate::patterns::MAGNITUDE;

/// Scale multiplier for a marker suffix.
fn scale(marker: Option<&str>) -> Option<u64> {
    match marker {
        None => Some(1),
        Some("천" | "k" | "K") => Some(1_000),
        Some("만") => Some(10_000),
        Some("m" | "M") => Some(1_000_000),
        Some("억") => Some(100_000_000),
        Some("b" | "B") => Some(1_000_000_000),
        Some(_) => None,
    }
}

/// Parse an abbreviated numeral into an integer.
///
/// Returns `None` for anything that is not a number optionally followed by
/// a single scale marker. Fractional parts are scaled exactly using integer
/// arithmetic, then truncated.
///
/// # Examples
///
/// ```
/// use rs_storyscrape::magnitude::parse;
///
/// assert_eq!(parse("13.7만"), Some(137_000));
/// assert_eq!(parse("1.2억"), Some(120_000_000));
/// assert_eq!(parse("5천"), Some(5_000));
/// assert_eq!(parse("999"), Some(999));
/// assert_eq!(parse("not a number"), None);
/// ```
#[must_use]
pub fn parse(input: &str) -> Option<u64> {
    let caps = MAGNITUDE.captures(input.trim())?;

    let whole: u64 = caps[1].replace(',', "").parse().ok()?;
    let multiplier = scale(caps.get(3).map(|m| m.as_str()))?;

    let mut value = whole.checked_mul(multiplier)?;

    if let Some(fraction) = caps.get(2) {
        let digits = fraction.as_str();
        let frac: u64 = digits.parse().ok()?;
        let denom = 10_u64.checked_pow(u32::try_from(digits.len()).ok()?)?;
        let scaled = frac.checked_mul(multiplier)? / denom;
        value = value.checked_add(scaled)?;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_korean_markers() {
        assert_eq!(parse("13.7만"), Some(137_000));
        assert_eq!(parse("1.2억"), Some(120_000_000));
        assert_eq!(parse("5천"), Some(5_000));
        assert_eq!(parse("3만"), Some(30_000));
    }

    #[test]
    fn parses_plain_numerals() {
        assert_eq!(parse("999"), Some(999));
        assert_eq!(parse("1,234,567"), Some(1_234_567));
        assert_eq!(parse("  42 "), Some(42));
    }

    #[test]
    fn parses_latin_suffixes() {
        assert_eq!(parse("1.5K"), Some(1_500));
        assert_eq!(parse("2.25M"), Some(2_250_000));
        assert_eq!(parse("1B"), Some(1_000_000_000));
    }

    #[test]
    fn unparsable_is_absent_not_zero() {
        assert_eq!(parse("not a number"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("만"), None);
        assert_eq!(parse("12.5.3"), None);
        assert_eq!(parse("13.7만회"), None);
    }

    #[test]
    fn fraction_without_marker_truncates() {
        assert_eq!(parse("9.9"), Some(9));
    }

    #[test]
    fn overflow_is_absent() {
        assert_eq!(parse("99999999999999999999억"), None);
    }

    #[test]
    fn repeated_parsing_is_idempotent() {
        for input in ["13.7만", "1.2억", "5천", "999", "1,204", "2.5M", "junk"] {
            let first = parse(input);
            for _ in 0..3 {
                assert_eq!(parse(input), first, "{input}");
            }
        }
    }
}
