//! Backslash escaping for the text notation.
//!
//! Names and values escape `{ } " ' \` with a leading backslash. Any other
//! escaped character stands for itself.

/// Characters that are always written with a backslash.
const SPECIAL: [char; 5] = ['{', '}', '"', '\'', '\\'];

/// Separator test shared by the tokenizer and writer: control characters,
/// space and DEL.
#[inline]
pub fn is_separator(c: char) -> bool {
    c <= '\u{20}' || c == '\u{7f}'
}

/// Escape `text` for the text notation.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// Escape `text`, appending to `out`.
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Escape an encoding qualifier, which additionally ends at `)`.
pub fn escape_qualifier_into(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == ')' || SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Remove one level of backslash escaping.
///
/// A trailing lone backslash is kept.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Strip one pair of matching surrounding quotes (`"` or `'`).
///
/// The closing quote must not itself be escaped. Text that is not wrapped is
/// returned unchanged.
pub fn unwrap_quotes(raw: &str) -> &str {
    let mut chars = raw.chars();
    let Some(open @ ('"' | '\'')) = chars.next() else {
        return raw;
    };
    let inner = &raw[1..];
    if inner.ends_with(open) && !ends_escaped(&inner[..inner.len() - 1]) {
        &inner[..inner.len() - 1]
    } else {
        raw
    }
}

/// Whether the text ends in an odd run of backslashes.
fn ends_escaped(text: &str) -> bool {
    text.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a raw string-array value into its quoted elements and unescape them.
///
/// Elements are separated by commas outside quotes. Unquoted elements are
/// accepted and unescaped as-is.
pub fn split_quoted_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in raw.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => {
                current.push(c);
                escaped = true;
            }
            ('"' | '\'', None) => {
                quote = Some(c);
                current.push(c);
            }
            (c, Some(q)) if c == q => {
                quote = None;
                current.push(c);
            }
            (',', None) => {
                items.push(unescape(unwrap_quotes(current.trim())));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    items.push(unescape(unwrap_quotes(current.trim())));
    items
}

/// Render strings as a comma separated list of escaped, double-quoted elements.
pub fn join_quoted_list(items: &[String]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        escape_into(&mut out, item);
        out.push('"');
    }
    out
}
