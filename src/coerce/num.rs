use std::borrow::Cow;

/// Drop `_` digit separators (`1_000`). A separator must sit between two
/// ASCII digits, otherwise the literal is rejected.
fn strip_digit_separators(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('_') {
        return Some(Cow::Borrowed(s));
    }
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let before = i.checked_sub(1).is_some_and(|j| chars[j].is_ascii_digit());
            let after = chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if !(before && after) { return None; }
            continue;
        }
        out.push(c);
    }
    Some(Cow::Owned(out))
}

/// Decimal integer with optional sign, surrounding whitespace ignored.
pub fn parse_int(raw: &str) -> Option<i64> {
    let digits = strip_digit_separators(raw.trim())?;
    digits.parse::<i64>().ok()
}

/// Float literal, including exponent form, `inf` and `nan`.
pub fn parse_float(raw: &str) -> Option<f64> {
    let digits = strip_digit_separators(raw.trim())?;
    digits.parse::<f64>().ok()
}
