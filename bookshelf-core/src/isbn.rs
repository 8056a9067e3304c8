//! ISBN normalization and check-digit validation

/// Normalize a scanned or typed ISBN: drop whitespace and dashes, upper-case letters
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether a normalized code is digits with at most a trailing `X`.
/// Only such codes are safe to put into a lookup URL.
pub fn is_well_formed(code: &str) -> bool {
    let body = code.strip_suffix('X').unwrap_or(code);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

/// Check whether a normalized string is a valid ISBN-10 or ISBN-13
pub fn is_valid(isbn: &str) -> bool {
    match isbn.len() {
        10 => is_valid_isbn10(isbn),
        13 => is_valid_isbn13(isbn),
        _ => false,
    }
}

fn is_valid_isbn10(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            // X stands for 10 and is only allowed as the check digit
            'X' if i == 9 => 10,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn is_valid_isbn13(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("978-0-545-02936-0"), "9780545029360");
        assert_eq!(normalize(" 0 306 40615 x "), "030640615X");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("9780545029360"));
        assert!(is_well_formed("080442957X"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("X"));
        assert!(!is_well_formed("../AUTHORS/OL1A"));
        assert!(!is_well_formed("1?X=Y"));
        assert!(!is_well_formed("97805X5029360"));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("9780545029360"));
        assert!(is_valid("0306406152"));
        assert!(is_valid("080442957X"));
        assert!(!is_valid("9780545029361"));
        assert!(!is_valid("12345"));
        assert!(!is_valid("X306406152"));
    }
}
