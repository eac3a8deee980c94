use std::borrow::Cow;

/// True when `s` is non-empty and every character is an ASCII digit.
/// Signs, decimal points and whitespace all fail.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `s` as a finite float. Surrounding whitespace, a sign, a decimal
/// point and an exponent are accepted; `NaN` and infinities are not.
pub fn parse_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn is_numeric(s: &str) -> bool {
    parse_numeric(s).is_some()
}

/// Keep at most `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Round to two decimals from the exact binary value of `v`, with exact
/// ties going to the even digit. `2.675` is stored just below the tie and
/// becomes `2.67`.
pub fn round_cents(v: f64) -> Option<f64> {
    format!("{:.2}", v)
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
}

/// Decode an object body as UTF-8, or as Latin-1 when it is not valid UTF-8.
/// A leading byte-order mark is dropped so it never leaks into the first
/// header name.
pub fn decode_body(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Err(_) => encoding_rs::mem::decode_latin1(bytes),
    }
}
