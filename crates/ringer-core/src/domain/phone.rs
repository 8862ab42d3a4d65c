use serde::Serialize;
use std::fmt;

/// Trailing digits of a phone number, at most `max_length` of them.
///
/// Every character that is not an ASCII digit is dropped first. When more
/// digits remain than `max_length`, the leading ones are cut so that numbers
/// delivered without their country or area prefix still line up with the
/// stored ones. A `max_length` of zero always produces the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedPhoneNumber(String);

impl NormalizedPhoneNumber {
    pub fn new(raw: &str, max_length: usize) -> Self {
        let digits = digits_only(raw);
        let start = digits.len().saturating_sub(max_length);
        // digits are ASCII, so byte offsets are char offsets
        Self(digits[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedPhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// True for strings made of digits and common dialing punctuation only.
pub fn is_phone_like(raw: &str) -> bool {
    let mut saw_digit = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            saw_digit = true;
            continue;
        }
        if ch.is_whitespace() || matches!(ch, '+' | '-' | '(' | ')' | '.' | '/') {
            continue;
        }
        return false;
    }
    saw_digit
}

/// Key an inbound address is looked up under: phone-like addresses are
/// normalized to the matching window, anything else is kept verbatim.
pub fn matching_key(address: &str, window: usize) -> String {
    if is_phone_like(address) {
        NormalizedPhoneNumber::new(address, window).into_string()
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{digits_only, is_phone_like, matching_key, NormalizedPhoneNumber};

    fn normalize(raw: &str, max_length: usize) -> String {
        NormalizedPhoneNumber::new(raw, max_length).into_string()
    }

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize("+1 (415) 555-1212", 20), "14155551212");
    }

    #[test]
    fn normalize_keeps_trailing_digits() {
        assert_eq!(normalize("12345678911", 7), "5678911");
        assert_eq!(normalize("+44 20 7946 0958", 7), "9460958");
    }

    #[test]
    fn normalize_exact_boundary_is_unchanged() {
        assert_eq!(normalize("1234567", 7), "1234567");
        assert_eq!(normalize("123-4567", 7), "1234567");
    }

    #[test]
    fn normalize_shorter_than_window_is_unchanged() {
        assert_eq!(normalize("555", 7), "555");
    }

    #[test]
    fn normalize_zero_window_is_empty() {
        assert_eq!(normalize("12345678911", 0), "");
        assert_eq!(normalize("", 0), "");
    }

    #[test]
    fn normalize_without_digits_is_empty() {
        assert_eq!(normalize("foo@host", 7), "");
        assert_eq!(normalize("", 7), "");
    }

    #[test]
    fn normalize_ignores_non_ascii_digits() {
        assert_eq!(normalize("١٢٣ 456", 7), "456");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = ["", "1", "+1 (415) 555-1212", "12345678911", "ext. 42", "a1b2c3"];
        for window in 1..=12 {
            for input in inputs {
                let once = normalize(input, window);
                assert_eq!(normalize(&once, window), once, "{input:?} at {window}");
            }
        }
    }

    #[test]
    fn normalize_length_is_min_of_digits_and_window() {
        let inputs = ["", "1", "+1 (415) 555-1212", "12345678911", "ext. 42", "a1b2c3"];
        for window in 1..=12 {
            for input in inputs {
                let expected = digits_only(input).len().min(window);
                assert_eq!(normalize(input, window).len(), expected, "{input:?} at {window}");
            }
        }
    }

    #[test]
    fn phone_like_detection() {
        assert!(is_phone_like("+1 (415) 555-1212"));
        assert!(is_phone_like("8678911"));
        assert!(is_phone_like("030/1234.56"));
        assert!(!is_phone_like("foo1@host"));
        assert!(!is_phone_like("12345@sip.example"));
        assert!(!is_phone_like("+ - ()"));
        assert!(!is_phone_like(""));
    }

    #[test]
    fn matching_key_leaves_emails_alone() {
        assert_eq!(matching_key("Foo1@Host", 7), "Foo1@Host");
        assert_eq!(matching_key("+1 234 567 8911", 7), "5678911");
    }
}
