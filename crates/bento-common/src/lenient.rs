//! Best-effort numeric text scanning.
//!
//! Text payloads have historically been read leniently: a malformed number
//! yields zero, and trailing garbage after a numeric prefix is ignored
//! (`"12px"` reads as `12`). Callers that need strict validation should use
//! [`str::parse`] directly.

use std::str::FromStr;

/// Scan an integer, falling back to the longest numeric prefix, then zero.
pub fn parse_int<T: FromStr + Default>(text: &str) -> T {
    let text = text.trim();
    if let Ok(value) = text.parse() {
        return value;
    }

    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    text[..end].parse().unwrap_or_default()
}

/// Scan a floating point number, falling back to the longest numeric prefix, then zero.
pub fn parse_float<T: FromStr + Default>(text: &str) -> T {
    let text = text.trim();
    if let Ok(value) = text.parse() {
        return value;
    }

    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    // Shrink until something parses ("1.5e" -> "1.5").
    (1..=end)
        .rev()
        .find_map(|n| text[..n].parse().ok())
        .unwrap_or_default()
}

/// Split `text` on `sep` into exactly `N` trimmed fields; missing fields are empty.
pub fn fields<const N: usize>(text: &str, sep: char) -> [&str; N] {
    let mut out = [""; N];
    for (slot, part) in out.iter_mut().zip(text.split(sep)) {
        *slot = part.trim();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<i32>("42"), 42);
        assert_eq!(parse_int::<i32>(" -7 "), -7);
        assert_eq!(parse_int::<i32>("12px"), 12);
        assert_eq!(parse_int::<i32>("abc"), 0);
        assert_eq!(parse_int::<u8>("300"), 0);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float::<f64>("1.5"), 1.5);
        assert_eq!(parse_float::<f64>("1.5e"), 1.5);
        assert_eq!(parse_float::<f32>("-0.25x"), -0.25);
        assert_eq!(parse_float::<f64>(""), 0.0);
    }

    #[test]
    fn test_fields() {
        assert_eq!(fields::<2>("1, 2", ','), ["1", "2"]);
        assert_eq!(fields::<3>("1,2", ','), ["1", "2", ""]);
    }
}
